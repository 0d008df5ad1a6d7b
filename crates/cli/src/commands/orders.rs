//! Order commands.

use clap::Subcommand;

use bocado_core::OrderId;

use super::{CommandResult, Context, print_json};

#[derive(Subcommand)]
pub enum OrderAction {
    /// Show an order with its customer and products
    Show { id: OrderId },
    /// Rate an order from 1 to 5
    Rate {
        id: OrderId,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
}

/// Run an order command.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn run(ctx: &Context, action: OrderAction) -> CommandResult {
    match action {
        OrderAction::Show { id } => print_json(&ctx.api.get_order(id).await?),
        OrderAction::Rate {
            id,
            rating,
            comment,
        } => print_json(&ctx.api.rate_order(id, rating, &comment).await?),
    }
}

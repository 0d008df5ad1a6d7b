//! Courier commands.

use clap::Subcommand;

use bocado_core::{OrderId, UserId};

use super::{CommandResult, Context, print_json};

#[derive(Subcommand)]
pub enum DriverAction {
    /// List all couriers
    List,
    /// Show one courier
    Show { id: UserId },
    /// Orders assigned to a courier (default: the signed-in user)
    Orders {
        #[arg(short, long)]
        driver: Option<UserId>,
    },
    /// Move an order to a new status (e.g. `en camino`, `entregado`)
    Status { order: OrderId, status: String },
}

/// Run a courier command.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn run(ctx: &Context, action: DriverAction) -> CommandResult {
    match action {
        DriverAction::List => print_json(&ctx.api.list_drivers().await?),
        DriverAction::Show { id } => print_json(&ctx.api.get_driver(id).await?),
        DriverAction::Orders { driver } => {
            let driver_id = match driver {
                Some(id) => id,
                None => ctx.signed_in_user()?.id,
            };
            print_json(&ctx.api.driver_orders(driver_id).await?)
        }
        DriverAction::Status { order, status } => {
            print_json(&ctx.api.update_order_status(order, &status).await?)
        }
    }
}

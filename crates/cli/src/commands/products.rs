//! Product commands.

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use bocado_core::models::ProductInput;
use bocado_core::{Price, ProductId, RestaurantId, UserId};

use super::{CommandResult, Context, print_json};

#[derive(Subcommand)]
pub enum ProductAction {
    /// Menu of a restaurant
    Menu { restaurant: RestaurantId },
    /// Products of a vendor (default: the signed-in user)
    Owned {
        #[arg(short, long)]
        user: Option<UserId>,
    },
    /// Add a product to a restaurant's menu
    Create {
        #[arg(long)]
        restaurant: RestaurantId,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Change fields of a product
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(Args)]
pub struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    category: Option<String>,
}

impl ProductFields {
    fn into_input(self, restaurant_id: Option<RestaurantId>) -> ProductInput {
        ProductInput {
            name: self.name,
            description: self.description,
            price: self.price.map(Price::new),
            image: self.image,
            restaurant_id,
            category: self.category,
        }
    }
}

/// Run a product command.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn run(ctx: &Context, action: ProductAction) -> CommandResult {
    match action {
        ProductAction::Menu { restaurant } => {
            print_json(&ctx.api.products_by_restaurant(restaurant).await)
        }
        ProductAction::Owned { user } => {
            let user_id = match user {
                Some(id) => id,
                None => ctx.signed_in_user()?.id,
            };
            print_json(&ctx.api.products_by_user(user_id).await?)
        }
        ProductAction::Create { restaurant, fields } => {
            print_json(&ctx.api.create_product(&fields.into_input(Some(restaurant))).await?)
        }
        ProductAction::Update { id, fields } => {
            print_json(&ctx.api.update_product(id, &fields.into_input(None)).await?)
        }
        ProductAction::Delete { id } => print_json(&ctx.api.delete_product(id).await?),
    }
}

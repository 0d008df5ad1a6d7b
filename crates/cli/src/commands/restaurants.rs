//! Restaurant commands.

use clap::{Args, Subcommand};

use bocado_client::Session;
use bocado_core::models::RestaurantInput;
use bocado_core::{RestaurantId, UserId};

use super::{CommandError, CommandResult, Context, print_json};

#[derive(Subcommand)]
pub enum RestaurantAction {
    /// List all restaurants
    List,
    /// Show one restaurant
    Show { id: RestaurantId },
    /// Restaurants owned by a user (default: the signed-in user)
    Owned {
        #[arg(short, long)]
        user: Option<UserId>,
    },
    /// Search restaurants
    Search { query: String },
    /// Register a restaurant owned by the signed-in vendor
    Create(RestaurantFields),
    /// Change fields of a restaurant
    Update {
        id: RestaurantId,
        #[command(flatten)]
        fields: RestaurantFields,
    },
    /// Delete a restaurant
    Delete { id: RestaurantId },
}

#[derive(Args)]
pub struct RestaurantFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// Image file name under the API's uploads, or an absolute URL
    #[arg(long)]
    image: Option<String>,
}

impl RestaurantFields {
    fn into_input(self, owner_id: Option<UserId>) -> RestaurantInput {
        RestaurantInput {
            name: self.name,
            description: self.description,
            address: self.address,
            phone: self.phone,
            category: self.category,
            image: self.image,
            owner_id,
        }
    }
}

/// Run a restaurant command.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn run(ctx: &Context, action: RestaurantAction) -> CommandResult {
    match action {
        RestaurantAction::List => print_json(&ctx.api.list_restaurants().await?),
        RestaurantAction::Show { id } => {
            let restaurant = ctx.api.get_restaurant(id).await?;
            let mut view = serde_json::to_value(&restaurant)?;
            if let (Some(url), Some(fields)) = (
                restaurant.image_url(ctx.api.base_url().as_str()),
                view.as_object_mut(),
            ) {
                fields.insert("imageUrl".to_string(), url.into());
            }
            print_json(&view)
        }
        RestaurantAction::Owned { user } => {
            let user_id = match user {
                Some(id) => id,
                None => ctx.signed_in_user()?.id,
            };
            print_json(&ctx.api.restaurants_by_user(user_id).await?)
        }
        RestaurantAction::Search { query } => {
            print_json(&ctx.api.search_restaurants(&query).await?)
        }
        RestaurantAction::Create(fields) => {
            let owner = ctx.signed_in_user()?;
            let created = ctx
                .api
                .create_restaurant(&fields.into_input(Some(owner.id)))
                .await?;

            let mut sessions = ctx.sessions()?;
            sessions.set_restaurant(Some(created.clone()))?;
            print_json(&created)
        }
        RestaurantAction::Update { id, fields } => {
            ensure_owner(ctx, id).await?;
            print_json(&ctx.api.update_restaurant(id, &fields.into_input(None)).await?)
        }
        RestaurantAction::Delete { id } => {
            ensure_owner(ctx, id).await?;
            let answer = ctx.api.delete_restaurant(id).await?;

            let mut sessions = ctx.sessions()?;
            if sessions
                .session()
                .and_then(Session::restaurant)
                .is_some_and(|r| r.id == id)
            {
                sessions.set_restaurant(None)?;
            }
            print_json(&answer)
        }
    }
}

/// Fail unless the signed-in user owns the restaurant.
async fn ensure_owner(ctx: &Context, id: RestaurantId) -> CommandResult {
    let user = ctx.signed_in_user()?;
    let restaurant = ctx.api.get_restaurant(id).await?;
    if restaurant.is_owned_by(user.id) {
        Ok(())
    } else {
        Err(CommandError::NotOwner(id.to_string()).into())
    }
}

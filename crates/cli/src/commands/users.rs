//! User commands.
//!
//! # Usage
//!
//! ```bash
//! bocado users register --name "Ana Pérez" --email ana@example.com --password ... --role cliente
//! bocado users show 3
//! ```

use clap::Subcommand;

use bocado_core::models::UserInput;
use bocado_core::{Email, Role, UserId};

use super::{CommandResult, Context, print_json};

#[derive(Subcommand)]
pub enum UserAction {
    /// List all users
    List,
    /// Show one user
    Show { id: UserId },
    /// Register a new user
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: Email,
        #[arg(short, long)]
        password: String,
        /// `cliente`, `vendedor` or `repartidor`
        #[arg(short, long)]
        role: Role,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

/// Run a user command.
///
/// # Errors
///
/// Returns an error if the API call fails.
pub async fn run(ctx: &Context, action: UserAction) -> CommandResult {
    match action {
        UserAction::List => print_json(&ctx.api.list_users().await?),
        UserAction::Show { id } => print_json(&ctx.api.get_user(id).await?),
        UserAction::Register {
            name,
            email,
            password,
            role,
            phone,
            address,
        } => {
            let user = UserInput {
                name,
                email,
                password,
                role,
                phone,
                address,
            };
            print_json(&ctx.api.create_user(&user).await?)
        }
    }
}

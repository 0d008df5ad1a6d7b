//! Session commands.
//!
//! Signing in records an existing user fetched from the API; credentials are
//! not checked.

use clap::Subcommand;
use serde_json::json;
use tracing::info;

use bocado_core::{Role, UserId};

use super::{CommandResult, Context, print_json, print_line};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Show the signed-in user
    Show,
    /// Sign in as an existing user
    SignIn {
        #[arg(short, long)]
        user: UserId,
    },
    /// Sign out and forget the session
    SignOut,
}

/// Run a session command.
///
/// # Errors
///
/// Returns an error if the state file cannot be read or written, or the
/// user cannot be fetched.
pub async fn run(ctx: &Context, action: SessionAction) -> CommandResult {
    let mut sessions = ctx.sessions()?;

    match action {
        SessionAction::Show => match sessions.session() {
            Some(session) => print_json(&json!({
                "user": session.user(),
                "restaurant": session.restaurant(),
                "home": session.user().role.home_path(),
            })),
            None => print_line("Not signed in"),
        },
        SessionAction::SignIn { user } => {
            let user = ctx.api.get_user(user).await?;
            let role = user.role;
            let user_id = user.id;
            sessions.sign_in(user)?;

            if role == Role::Vendor {
                let restaurant = ctx
                    .api
                    .restaurants_by_user(user_id)
                    .await?
                    .into_iter()
                    .find(|r| r.is_owned_by(user_id));
                if let Some(r) = &restaurant {
                    info!(restaurant_id = %r.id, "Vendor restaurant loaded");
                }
                sessions.set_restaurant(restaurant)?;
            }

            print_line(format!(
                "Signed in as user {user_id} ({role}). Home: {}",
                role.home_path()
            ))
        }
        SessionAction::SignOut => {
            sessions.sign_out()?;
            print_line("Signed out")
        }
    }
}

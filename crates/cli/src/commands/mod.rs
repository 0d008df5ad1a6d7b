//! Subcommand implementations and the state they share.

pub mod cart;
pub mod drivers;
pub mod navigate;
pub mod orders;
pub mod products;
pub mod restaurants;
pub mod session;
pub mod users;

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use bocado_client::{
    ApiClient, CartManager, ClientConfig, JsonFileStore, SessionStore, cart::CartError,
    session::SessionError,
};
use bocado_core::models::User;

/// Result type for command handlers.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Errors raised by the commands themselves (as opposed to the library).
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command needs a signed-in user.
    #[error("Not signed in. Run `bocado session sign-in --user <id>` first")]
    NotSignedIn,

    /// The product is not on the restaurant's menu.
    #[error("Product {product} not found on the menu of restaurant {restaurant}")]
    ProductNotFound { product: String, restaurant: String },

    /// The signed-in user does not own the restaurant.
    #[error("Restaurant {0} belongs to another vendor")]
    NotOwner(String),
}

/// Configuration and API client shared by every command.
#[derive(Debug)]
pub struct Context {
    pub config: ClientConfig,
    pub api: ApiClient,
}

impl Context {
    pub fn new(config: ClientConfig) -> Self {
        let api = ApiClient::new(&config.api);
        Self { config, api }
    }

    /// A handle on the state file. Handles are cheap and always consistent.
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.config.state_file)
    }

    /// The persisted cart.
    pub fn cart(&self) -> Result<CartManager<JsonFileStore>, CartError> {
        CartManager::new(self.store())
    }

    /// The persisted session, restored.
    pub fn sessions(&self) -> Result<SessionStore<JsonFileStore>, SessionError> {
        let mut sessions = SessionStore::new(self.store());
        sessions.restore()?;
        Ok(sessions)
    }

    /// The signed-in user, or [`CommandError::NotSignedIn`].
    pub fn signed_in_user(&self) -> Result<User, Box<dyn std::error::Error>> {
        let sessions = self.sessions()?;
        sessions
            .user()
            .cloned()
            .ok_or_else(|| CommandError::NotSignedIn.into())
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CommandResult {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Print one line on stdout.
pub fn print_line(line: impl std::fmt::Display) -> CommandResult {
    writeln!(std::io::stdout().lock(), "{line}")?;
    Ok(())
}

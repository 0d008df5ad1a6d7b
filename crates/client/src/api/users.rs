//! User endpoints.
//!
//! These endpoints may answer either with the bare resource or wrapped in the
//! `{ success, data, message }` envelope; both are accepted.

use tracing::{error, instrument};

use bocado_core::UserId;
use bocado_core::models::{User, UserInput};

use super::{ApiClient, ApiError, Payload};

impl ApiClient {
    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get::<Payload<Vec<User>>>(&["users"], &[])
            .await
            .and_then(Payload::into_result)
            .inspect_err(|e| error!(error = %e, "Failed to list users"))
    }

    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the user does not exist, or the
    /// body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        let id = id.to_string();
        self.get::<Payload<User>>(&["users", id.as_str()], &[])
            .await
            .and_then(Payload::into_result)
            .inspect_err(|e| error!(error = %e, "Failed to fetch user"))
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the registration or the body cannot
    /// be decoded.
    #[instrument(skip(self, user), fields(email = %user.email, role = %user.role))]
    pub async fn create_user(&self, user: &UserInput) -> Result<User, ApiError> {
        self.post::<_, Payload<User>>(&["users"], user)
            .await
            .and_then(Payload::into_result)
            .inspect_err(|e| error!(error = %e, "Failed to create user"))
    }
}

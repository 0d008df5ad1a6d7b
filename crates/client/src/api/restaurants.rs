//! Restaurant endpoints.

use serde_json::Value;
use tracing::{debug, error, instrument};

use bocado_core::models::{Restaurant, RestaurantInput};
use bocado_core::{RestaurantId, UserId};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// List all restaurants.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        self.get(&["restaurants"], &[])
            .await
            .inspect_err(|e| error!(error = %e, "Failed to list restaurants"))
    }

    /// Fetch one restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the restaurant does not exist,
    /// or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get_restaurant(&self, id: RestaurantId) -> Result<Restaurant, ApiError> {
        let id = id.to_string();
        self.get(&["restaurants", id.as_str()], &[])
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch restaurant"))
    }

    /// Restaurants owned by a user.
    ///
    /// A user without restaurants is answered with 404 by the API; that
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error for any other failure.
    #[instrument(skip(self))]
    pub async fn restaurants_by_user(&self, user_id: UserId) -> Result<Vec<Restaurant>, ApiError> {
        let user_id = user_id.to_string();
        match self.get(&["restaurants", "usuario", user_id.as_str()], &[]).await {
            Err(e) if e.is_not_found() => {
                debug!("User owns no restaurants");
                Ok(Vec::new())
            }
            result => result
                .inspect_err(|e| error!(error = %e, "Failed to fetch restaurants by user")),
        }
    }

    /// Create a restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the restaurant or the body cannot
    /// be decoded.
    #[instrument(skip(self, restaurant))]
    pub async fn create_restaurant(
        &self,
        restaurant: &RestaurantInput,
    ) -> Result<Restaurant, ApiError> {
        self.post(&["restaurants"], restaurant)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create restaurant"))
    }

    /// Partially update a restaurant. Only the fields set in `patch` change.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self, patch))]
    pub async fn update_restaurant(
        &self,
        id: RestaurantId,
        patch: &RestaurantInput,
    ) -> Result<Restaurant, ApiError> {
        let id = id.to_string();
        self.patch(&["restaurants", id.as_str()], patch)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to update restaurant"))
    }

    /// Delete a restaurant. Returns whatever the API answers (`Null` for an
    /// empty body).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_restaurant(&self, id: RestaurantId) -> Result<Value, ApiError> {
        let id = id.to_string();
        self.delete(&["restaurants", id.as_str()])
            .await
            .inspect_err(|e| error!(error = %e, "Failed to delete restaurant"))
    }

    /// Search restaurants by free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn search_restaurants(&self, query: &str) -> Result<Vec<Restaurant>, ApiError> {
        self.get(&["restaurants", "search"], &[("q", query)])
            .await
            .inspect_err(|e| error!(error = %e, "Failed to search restaurants"))
    }
}

//! Product endpoints.

use serde_json::Value;
use tracing::{error, instrument, warn};

use bocado_core::models::{Product, ProductInput};
use bocado_core::{ProductId, RestaurantId, UserId};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Menu of a restaurant.
    ///
    /// Never fails: any error, or a body that is not an array of products,
    /// is logged and yields an empty menu.
    #[instrument(skip(self))]
    pub async fn products_by_restaurant(&self, restaurant_id: RestaurantId) -> Vec<Product> {
        let restaurant_id = restaurant_id.to_string();
        let body = match self
            .get::<Value>(&["products", "restaurant", restaurant_id.as_str()], &[])
            .await
        {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to fetch products by restaurant");
                return Vec::new();
            }
        };

        if !body.is_array() {
            warn!("Products response is not an array");
            return Vec::new();
        }

        serde_json::from_value(body).unwrap_or_else(|e| {
            error!(error = %e, "Failed to decode products by restaurant");
            Vec::new()
        })
    }

    /// Products belonging to the restaurants of a vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn products_by_user(&self, user_id: UserId) -> Result<Vec<Product>, ApiError> {
        let user_id = user_id.to_string();
        self.get(&["products", "user", user_id.as_str()], &[])
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch products by user"))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the product or the body cannot be
    /// decoded.
    #[instrument(skip(self, product))]
    pub async fn create_product(&self, product: &ProductInput) -> Result<Product, ApiError> {
        self.post(&["products"], product)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create product"))
    }

    /// Partially update a product. Only the fields set in `patch` change.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductInput,
    ) -> Result<Product, ApiError> {
        let id = id.to_string();
        self.patch(&["products", id.as_str()], patch)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to update product"))
    }

    /// Delete a product. Returns whatever the API answers (`Null` for an
    /// empty body).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<Value, ApiError> {
        let id = id.to_string();
        self.delete(&["products", id.as_str()])
            .await
            .inspect_err(|e| error!(error = %e, "Failed to delete product"))
    }
}

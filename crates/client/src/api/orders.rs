//! Order endpoints.

use serde_json::Value;
use tracing::{error, info, instrument};

use bocado_core::OrderId;
use bocado_core::models::{Order, OrderInput, OrderRating};

use super::{ApiClient, ApiError};

/// Relations embedded in an order detail response.
const ORDER_EXPAND: &str = "usuario,orderItems.producto";

impl ApiClient {
    /// Fetch one order with its customer and product details embedded.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the order does not exist, or
    /// the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        let id = id.to_string();
        self.get(&["orders", id.as_str()], &[("_expand", ORDER_EXPAND)])
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch order"))
    }

    /// Rate a delivered order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the rating.
    #[instrument(skip(self, comment))]
    pub async fn rate_order(
        &self,
        id: OrderId,
        rating: u8,
        comment: &str,
    ) -> Result<Value, ApiError> {
        let id = id.to_string();
        let body = OrderRating {
            rating,
            comment: comment.to_string(),
        };
        self.post(&["orders", id.as_str(), "rate"], &body)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to rate order"))
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the order or the body cannot be
    /// decoded.
    #[instrument(skip(self, order), fields(restaurant_id = %order.restaurant_id, total = %order.total))]
    pub async fn create_order(&self, order: &OrderInput) -> Result<Order, ApiError> {
        let created: Order = self
            .post(&["orders"], order)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to create order"))?;
        info!(order_id = %created.id, "Order created");
        Ok(created)
    }
}

//! Courier endpoints.
//!
//! Couriers are users with the `repartidor` role, so the listings go through
//! `/users` and accept the same response envelope.

use tracing::{error, info, instrument};

use bocado_core::models::{Order, OrderStatusUpdate, User};
use bocado_core::{OrderId, Role, UserId};

use super::{ApiClient, ApiError, Payload};

impl ApiClient {
    /// List all couriers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_drivers(&self) -> Result<Vec<User>, ApiError> {
        self.get::<Payload<Vec<User>>>(&["users"], &[("rol", Role::Courier.as_str())])
            .await
            .and_then(Payload::into_result)
            .inspect_err(|e| error!(error = %e, "Failed to list drivers"))
    }

    /// Fetch one courier.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the courier does not exist, or
    /// the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn get_driver(&self, id: UserId) -> Result<User, ApiError> {
        let id = id.to_string();
        self.get::<Payload<User>>(&["users", id.as_str()], &[("rol", Role::Courier.as_str())])
            .await
            .and_then(Payload::into_result)
            .inspect_err(|e| error!(error = %e, "Failed to fetch driver"))
    }

    /// Orders assigned to a courier.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn driver_orders(&self, driver_id: UserId) -> Result<Vec<Order>, ApiError> {
        let driver_id = driver_id.to_string();
        self.get(&["orders"], &[("repartidorId", driver_id.as_str())])
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch driver orders"))
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: &str,
    ) -> Result<Order, ApiError> {
        let id = order_id.to_string();
        let body = OrderStatusUpdate {
            status: status.to_string(),
        };
        let updated: Order = self
            .patch(&["orders", id.as_str()], &body)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to update order status"))?;
        info!(status = %updated.status, "Order status updated");
        Ok(updated)
    }
}

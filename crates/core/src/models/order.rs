//! Orders and their line items.

use serde::{Deserialize, Serialize};

use crate::types::{OrderId, Price, ProductId, RestaurantId, UserId};

/// Status assigned to orders created from a cart.
pub const STATUS_PENDING: &str = "pendiente";

/// An order as returned by `/orders`.
///
/// The status is kept as the API's free-form string; couriers move it along
/// with [`OrderStatusUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(rename = "usuarioId", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
    #[serde(rename = "restauranteId", default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
    #[serde(rename = "repartidorId", default, skip_serializing_if = "Option::is_none")]
    pub courier_id: Option<UserId>,
    #[serde(rename = "estado", default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Price>,
    #[serde(rename = "direccionEntrega", default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(rename = "metodoPago", default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(rename = "orderItems", default)]
    pub items: Vec<OrderItem>,
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "productoId")]
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precio", default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Price>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInput {
    #[serde(rename = "usuarioId")]
    pub customer_id: UserId,
    #[serde(rename = "restauranteId")]
    pub restaurant_id: RestaurantId,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "direccionEntrega")]
    pub delivery_address: String,
    #[serde(rename = "metodoPago")]
    pub payment_method: String,
    pub subtotal: Price,
    #[serde(rename = "costoEnvio")]
    pub shipping_fee: Price,
    pub total: Price,
    #[serde(rename = "orderItems")]
    pub items: Vec<OrderItemInput>,
}

/// One line of an [`OrderInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemInput {
    #[serde(rename = "productoId")]
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    #[serde(rename = "precio")]
    pub unit_price: Price,
    #[serde(rename = "notas", skip_serializing_if = "String::is_empty", default)]
    pub notes: String,
}

/// Payload for `POST /orders/:id/rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRating {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// Payload for `PATCH /orders/:id` when a courier changes the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    #[serde(rename = "estado")]
    pub status: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_expanded_order() {
        let json = r#"{
            "id": 30,
            "usuarioId": 4,
            "estado": "en camino",
            "total": 12000,
            "usuario": {"id": 4, "nombre": "Camila"},
            "orderItems": [
                {"productoId": 11, "cantidad": 2, "precio": 5000, "producto": {"id": 11}}
            ]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.customer_id, Some(UserId::new(4)));
        assert_eq!(order.courier_id, None);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, Some(Price::from_whole(12000)));
    }

    #[test]
    fn test_decode_minimal_order() {
        let order: Order = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(order.status.is_empty());
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_status_update_wire_name() {
        let body = OrderStatusUpdate {
            status: "entregado".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"estado": "entregado"})
        );
    }
}

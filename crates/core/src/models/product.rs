//! Menu products.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, RestaurantId};

/// A product on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: Price,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "restauranteId", alias = "restaurantId")]
    pub restaurant_id: RestaurantId,
    #[serde(
        rename = "restauranteNombre",
        alias = "restaurantName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub restaurant_name: Option<String>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Payload for creating (`POST`) or partially updating (`PATCH`) a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "restauranteId", default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_names() {
        let json = r#"{
            "id": 11,
            "nombre": "Completo italiano",
            "precio": "3500.00",
            "restauranteId": 2,
            "restauranteNombre": "Fuente Alemana",
            "stock": 40
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Price::from_whole(3500));
        assert_eq!(product.restaurant_name.as_deref(), Some("Fuente Alemana"));
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_decode_english_aliases() {
        let json = r#"{"id": 1, "nombre": "Té", "precio": 900, "restaurantId": 5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.restaurant_id, RestaurantId::new(5));
    }
}

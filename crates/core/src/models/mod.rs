//! Domain models as exchanged with the Bocado REST API.
//!
//! Rust field names are English; the `serde` attributes carry the wire names
//! the API uses. Unknown fields are ignored and optional fields default, so a
//! model keeps decoding when the API adds columns.

pub mod order;
pub mod product;
pub mod restaurant;
pub mod user;

pub use order::{Order, OrderInput, OrderItem, OrderItemInput, OrderRating, OrderStatusUpdate};
pub use product::{Product, ProductInput};
pub use restaurant::{Restaurant, RestaurantInput};
pub use user::{User, UserInput};

/// Deserialize an optional ID that the API may send as a number or a numeric
/// string (`"idUsuario": "3"`).
pub(crate) mod lenient_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i32),
        Text(String),
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<i32>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(n)) => Ok(Some(T::from(n))),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Raw::Text(s)) => s
                .trim()
                .parse::<i32>()
                .map(|n| Some(T::from(n)))
                .map_err(serde::de::Error::custom),
        }
    }
}

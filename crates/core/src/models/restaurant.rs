//! Restaurants.

use serde::{Deserialize, Serialize};

use crate::types::{RestaurantId, UserId};

/// A restaurant as returned by `/restaurants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Either an absolute URL or a file name under the API's `/uploads`.
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// The vendor who owns the restaurant.
    #[serde(
        rename = "idUsuario",
        default,
        deserialize_with = "super::lenient_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_id: Option<UserId>,
}

impl Restaurant {
    /// Resolve the image reference against the API base URL.
    ///
    /// Absolute `http(s)` URLs are returned unchanged; bare file names are
    /// served from `{api_base}/uploads/`.
    #[must_use]
    pub fn image_url(&self, api_base: &str) -> Option<String> {
        let image = self.image.as_deref().filter(|s| !s.is_empty())?;
        if image.starts_with("http") {
            return Some(image.to_owned());
        }
        Some(format!(
            "{}/uploads/{}",
            api_base.trim_end_matches('/'),
            image.trim_start_matches('/')
        ))
    }

    /// Returns `true` if the restaurant belongs to the given vendor.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }
}

/// Payload for creating (`POST`) or partially updating (`PATCH`) a restaurant.
///
/// Fields left as `None` are omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantInput {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "imagen", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "idUsuario", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
}

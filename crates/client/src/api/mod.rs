//! REST API client for the Bocado backend.
//!
//! [`ApiClient`] wraps one `reqwest::Client` and the configured base URL.
//! Resource operations live in submodules:
//!
//! - [`users`] - list, fetch and register users
//! - [`restaurants`] - restaurant CRUD, lookup by owner and search
//! - [`products`] - product listing and vendor product management
//! - [`orders`] - order detail, rating and creation
//! - [`drivers`] - courier listings, assigned orders and status updates
//!
//! Every operation performs exactly one request. There is no retry, caching,
//! pagination or authentication header. Failures are logged with
//! `tracing::error!` before being returned.

pub mod drivers;
pub mod orders;
pub mod products;
pub mod restaurants;
pub mod users;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;

/// Longest slice of a response body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur when talking to the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The response body is not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry resource paths.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The API answered `{ "success": false }` in its response envelope.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Returns `true` for an HTTP 404 answer.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Bocado REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// The base URL resource paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build `{base}/{segments...}?{query}`.
    ///
    /// Segments are percent-encoded individually, so an id or search term can
    /// never change the path structure.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(segments, query)?;
        debug!(%url, "GET");
        execute(self.inner.client.get(url)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(segments, &[])?;
        debug!(%url, "POST");
        execute(self.inner.client.post(url).json(body)).await
    }

    async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(segments, &[])?;
        debug!(%url, "PATCH");
        execute(self.inner.client.patch(url).json(body)).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<Value, ApiError> {
        let url = self.url(segments, &[])?;
        debug!(%url, "DELETE");
        execute(self.inner.client.delete(url)).await
    }

}

/// Send a request and decode the JSON body.
async fn execute<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    // Get response body as text first for better error diagnostics
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&body, status),
        });
    }

    decode(&body)
}

/// Decode a response body. An empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(body)?)
}

/// Best human-readable message for a failed response: the body's `message`
/// field, else the start of the body, else the status reason.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body)
        && let Some(Value::String(message)) = map.get("message")
    {
        return message.clone();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}

/// A response body that may or may not be wrapped in the
/// `{ "success", "data", "message" }` envelope some endpoints use.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope {
        success: bool,
        data: Option<T>,
        message: Option<String>,
    },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_result(self) -> Result<T, ApiError> {
        match self {
            Self::Bare(value)
            | Self::Envelope {
                success: true,
                data: Some(value),
                ..
            } => Ok(value),
            Self::Envelope {
                success: true,
                data: None,
                ..
            } => Err(ApiError::Rejected("response carried no data".to_string())),
            Self::Envelope {
                success: false,
                message,
                ..
            } => Err(ApiError::Rejected(
                message.unwrap_or_else(|| "request was not successful".to_string()),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig::new(base).unwrap())
    }

    #[test]
    fn test_url_joins_segments() {
        let client = client("http://localhost:3000");
        let url = client.url(&["restaurants", "usuario", "3"], &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/restaurants/usuario/3");
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = client("https://api.bocado.test/v1/");
        let url = client.url(&["products", "7"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.bocado.test/v1/products/7");
    }

    #[test]
    fn test_url_encodes_query_and_segments() {
        let client = client("http://localhost:3000");
        let url = client
            .url(&["restaurants", "search"], &[("q", "sushi & ramen")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/restaurants/search?q=sushi+%26+ramen"
        );

        let url = client.url(&["users", "1/2"], &[]).unwrap();
        assert_eq!(url.path(), "/users/1%2F2");
    }

    #[test]
    fn test_decode_empty_body_is_null() {
        let value: Value = decode("").unwrap();
        assert_eq!(value, Value::Null);
        assert!(decode::<Vec<i32>>("  ").is_err());
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(r#"{"message": "Email ya registrado"}"#, status),
            "Email ya registrado"
        );
        assert_eq!(error_message("", status), "Bad Request");
        assert_eq!(error_message("boom", status), "boom");
    }

    #[test]
    fn test_payload_bare_and_envelope() {
        let bare: Payload<Vec<i32>> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(bare.into_result().unwrap(), vec![1, 2]);

        let wrapped: Payload<Vec<i32>> =
            serde_json::from_str(r#"{"success": true, "data": [3]}"#).unwrap();
        assert_eq!(wrapped.into_result().unwrap(), vec![3]);
    }

    #[test]
    fn test_payload_of_model_without_default() {
        use bocado_core::models::User;

        let json = r#"{"success": true, "data": {"id": 3, "nombre": "Carla", "email": "carla@example.com", "rol": "repartidor"}}"#;
        let wrapped: Payload<User> = serde_json::from_str(json).unwrap();
        assert_eq!(wrapped.into_result().unwrap().name, "Carla");

        let empty: Payload<Vec<User>> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(empty.into_result(), Err(ApiError::Rejected(_))));
    }

    #[test]
    fn test_payload_rejected() {
        let rejected: Payload<Vec<i32>> =
            serde_json::from_str(r#"{"success": false, "message": "Usuario no encontrado"}"#)
                .unwrap();
        assert!(matches!(
            rejected.into_result(),
            Err(ApiError::Rejected(ref m)) if m == "Usuario no encontrado"
        ));
    }

    #[test]
    fn test_is_not_found() {
        let err = ApiError::Status {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!ApiError::Rejected(String::new()).is_not_found());
    }
}

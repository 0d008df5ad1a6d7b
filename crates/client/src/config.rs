//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOCADO_API_URL` - Base URL of the REST API (default: `http://localhost:3000`)
//! - `BOCADO_STATE_FILE` - Path of the persisted client state (default: `.bocado/state.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default state file path, relative to the working directory.
pub const DEFAULT_STATE_FILE: &str = ".bocado/state.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// REST API connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL all resource paths are appended to
    pub base_url: Url,
}

impl ApiConfig {
    /// Parse and validate a base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` (attributed to `BOCADO_API_URL`)
    /// if the URL does not parse, is not http(s), or cannot carry path
    /// segments.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEnvVar("BOCADO_API_URL".to_string(), reason);

        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }

        Ok(Self { base_url: url })
    }
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API settings
    pub api: ApiConfig,
    /// JSON file backing the key-value store
    pub state_file: PathBuf,
    /// Sentry DSN for error tracking (optional)
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (optional)
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BOCADO_API_URL` is not a valid base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::new(&get_env_or_default("BOCADO_API_URL", DEFAULT_API_URL))?;
        let state_file = PathBuf::from(get_env_or_default("BOCADO_STATE_FILE", DEFAULT_STATE_FILE));

        Ok(Self {
            api,
            state_file,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_default_url() {
        let config = ApiConfig::new(DEFAULT_API_URL).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn test_api_config_accepts_path_prefix() {
        let config = ApiConfig::new("https://api.bocado.test/v1").unwrap();
        assert_eq!(config.base_url.path(), "/v1");
    }

    #[test]
    fn test_api_config_rejects_garbage() {
        let result = ApiConfig::new("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "BOCADO_API_URL"));
    }

    #[test]
    fn test_api_config_rejects_non_http() {
        assert!(ApiConfig::new("mailto:ana@example.com").is_err());
        assert!(ApiConfig::new("ftp://files.example.com").is_err());
    }
}

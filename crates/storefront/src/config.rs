//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPVISTA_DATA_DIR` - Directory for persisted state (default: .shopvista)
//! - `SHOPVISTA_CATALOG_PATH` - Catalog JSON file used by search
//! - `SHOPVISTA_ORDER_DELAY_MS` - Simulated order submission latency (default: 2000)
//! - `SHOPVISTA_AUTH_DELAY_MS` - Simulated sign-in/sign-up latency (default: 1000)
//! - `SHOPVISTA_FEEDBACK_DELAY_MS` - Simulated feedback delivery latency (default: 2000)
//! - `SHOPVISTA_PAGE_URL` - Page URL stamped on feedback payloads (default: <http://localhost/>)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::transport::Latency;

const DEFAULT_DATA_DIR: &str = ".shopvista";
const DEFAULT_PAGE_URL: &str = "http://localhost/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory holding one JSON file per persisted key
    pub data_dir: PathBuf,
    /// Catalog JSON file, if configured
    pub catalog_path: Option<PathBuf>,
    /// Simulated network latencies
    pub latency: Latency,
    /// Page URL reported with feedback submissions
    pub page_url: Url,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(get_or_default(&lookup, "SHOPVISTA_DATA_DIR", DEFAULT_DATA_DIR));
        let catalog_path = get_optional(&lookup, "SHOPVISTA_CATALOG_PATH").map(PathBuf::from);

        let defaults = Latency::default();
        let latency = Latency {
            order: get_millis(&lookup, "SHOPVISTA_ORDER_DELAY_MS", defaults.order)?,
            auth: get_millis(&lookup, "SHOPVISTA_AUTH_DELAY_MS", defaults.auth)?,
            feedback: get_millis(&lookup, "SHOPVISTA_FEEDBACK_DELAY_MS", defaults.feedback)?,
        };

        let page_url = get_or_default(&lookup, "SHOPVISTA_PAGE_URL", DEFAULT_PAGE_URL)
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPVISTA_PAGE_URL".to_string(), e.to_string()))?;

        Ok(Self {
            data_dir,
            catalog_path,
            latency,
            page_url,
        })
    }

    /// Built-in defaults, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the defaults are valid.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_lookup(|_| None)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating an empty value as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Get a millisecond duration.
fn get_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    get_optional(lookup, key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

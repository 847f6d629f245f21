//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults match a local checkout with the
//! feed and state file next to the binary.
//!
//! - `PATISSERIE_CATALOG_URL` - Catalog feed source: a local path or an
//!   `http(s)` URL (default: `./data.json`)
//! - `PATISSERIE_STATE_PATH` - Path of the persisted cart state file
//!   (default: `./state/cart.json`)

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
///
/// Every variable has a default, so the only failure mode is a present but
/// invalid value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog feed source: a filesystem path or an `http(s)` URL.
    pub catalog_url: String,
    /// Path of the persisted cart state file.
    pub state_path: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid (e.g., a
    /// catalog URL with an unsupported scheme).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Separated from [`Self::from_env`] so tests can inject variables
    /// without mutating the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a looked-up value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_url =
            lookup("PATISSERIE_CATALOG_URL").unwrap_or_else(|| "./data.json".to_owned());
        validate_catalog_url(&catalog_url)?;

        let state_path = lookup("PATISSERIE_STATE_PATH")
            .map_or_else(|| PathBuf::from("./state/cart.json"), PathBuf::from);

        Ok(Self {
            catalog_url,
            state_path,
        })
    }
}

/// Reject catalog sources with schemes nobody can fetch.
///
/// Bare paths (no scheme) are fine; they are read from the filesystem.
fn validate_catalog_url(value: &str) -> Result<(), ConfigError> {
    if let Ok(parsed) = url::Url::parse(value) {
        let scheme = parsed.scheme();
        // Windows drive letters parse as single-letter schemes; treat those
        // as filesystem paths.
        if scheme.len() > 1 && !matches!(scheme, "http" | "https" | "file") {
            return Err(ConfigError::InvalidEnvVar(
                "PATISSERIE_CATALOG_URL".to_owned(),
                format!("unsupported scheme: {scheme}"),
            ));
        }
    }
    Ok(())
}

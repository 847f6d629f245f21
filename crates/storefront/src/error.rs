//! Unified error handling.
//!
//! Provides a unified `AppError` type wrapping the per-module error enums.
//! Nothing in this system is fatal: catalog failures are surfaced and
//! recoverable by retry, persistence failures are logged and swallowed at
//! the call site, and stale cart references are not errors at all.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog feed could not be fetched or parsed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart persistence operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Checkout was requested with nothing in the cart.
    ///
    /// The view layer disables the checkout action for empty carts; hitting
    /// this variant means a caller bypassed the view gating.
    #[error("Cannot confirm an empty cart")]
    EmptyCart,
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::EmptyCart;
        assert_eq!(err.to_string(), "Cannot confirm an empty cart");

        let err = AppError::Config(ConfigError::InvalidEnvVar(
            "PATISSERIE_CATALOG_URL".to_owned(),
            "unsupported scheme: ftp".to_owned(),
        ));
        assert_eq!(
            err.to_string(),
            "Config error: Invalid environment variable PATISSERIE_CATALOG_URL: unsupported scheme: ftp"
        );
    }

    #[test]
    fn test_store_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = StoreError::from(io).into();
        assert!(matches!(err, AppError::Store(_)));
    }
}

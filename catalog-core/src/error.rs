/// Structured error types for catalog-core.
///
/// The binary (catalog-cli) wraps these in `anyhow` with context,
/// the store crate folds `ValidationError` into its own `DbError`.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// Main error type for catalog-core operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file exists but is not valid TOML for `CatalogConfig`
    #[error("Invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Field validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for catalog-core operations
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Create a config parse error for the file at `path`
    pub fn config_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::config("max_connections must be at least 1");
        assert_eq!(
            err.to_string(),
            "Configuration error: max_connections must be at least 1"
        );

        let err: CatalogError = ValidationError::Empty {
            field: "product name",
        }
        .into();
        assert_eq!(err.to_string(), "product name cannot be empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: CatalogError = io_err.into();

        assert!(matches!(err, CatalogError::Io { .. }));
    }
}

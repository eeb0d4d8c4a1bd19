//! Error types for Fanart.
//!
//! This module provides the unified error type returned by CLI commands and
//! the public entry points of the library.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::index::IndexError;

/// Errors that can occur during application execution.
#[derive(Debug, Error)]
pub enum FanartError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Cache operation failed.
    #[error("Cache error: {0}")]
    CacheError(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Image index operation failed.
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
    /// Animated catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Directory scan could not be performed.
    #[error("Scan error: {0}")]
    ScanError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for FanartError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for FanartError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for FanartError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<String> for FanartError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for FanartError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_display() {
        let err = FanartError::InvalidArguments("Cannot combine --folder with --all".to_string());
        assert!(err.to_string().contains("Cannot combine --folder with --all"));
    }

    #[test]
    fn test_cache_error_display() {
        let err = FanartError::CacheError("Failed to remove directory".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Cache error"));
        assert!(msg.contains("Failed to remove directory"));
    }

    #[test]
    fn test_scan_error_display() {
        let err = FanartError::ScanError("scan already running".to_string());
        assert!(err.to_string().starts_with("Scan error"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: FanartError = io_err.into();
        assert!(matches!(err, FanartError::IoError(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_index_error_converts() {
        let err: FanartError = IndexError::Unavailable("locked".to_string()).into();
        assert!(matches!(err, FanartError::Index(_)));
        assert!(err.to_string().contains("Index error"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: FanartError = ConfigError::NotFound.into();
        assert!(matches!(err, FanartError::ConfigError(_)));
    }

    #[test]
    fn test_from_str() {
        let err: FanartError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}

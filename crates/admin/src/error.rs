//! Unified error handling for wiring the dashboard together.
//!
//! Individual layers keep their own error types; this one only covers
//! start-up, where any of them can stop the application from being built.

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::ApiError;
use crate::session::StorageError;

/// Application-level error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Session storage failed.
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

//! Unified error types for MPN Core.

use mpn_types::ConfigError;
use thiserror::Error;

/// Main error type for setting up a migration run.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// HTTP client could not be built.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for MPN Core operations.
pub type AppResult<T> = Result<T, AppError>;

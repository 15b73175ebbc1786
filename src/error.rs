//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::config::ConfigError;

/// Main application error type.
///
/// Encompasses every error type in the crate, with `thiserror` deriving the
/// conversions.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Report serialization errors
    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

//! Error types for tomata-core.
//!
//! The countdown and the mode state machine themselves are infallible;
//! errors only arise at the configuration and persistence boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for tomata-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration load/save/lookup errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid settings values caught at the configuration boundary
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key in a get/set request
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse a configuration value
    #[error("Failed to parse configuration value: {0}")]
    ParseFailed(String),
}

/// Validation errors.
///
/// The core assumes durations >= 1 minute and a positive long-break
/// interval; anything else is rejected here before it reaches a timer.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

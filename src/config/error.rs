//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid inference service URL: {0}")]
    InvalidServiceUrl(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid turn timeout")]
    InvalidTurnTimeout,

    #[error("Transition dwell exceeds {max_ms}ms")]
    DwellTooLong { max_ms: u64 },

    #[error("Typing delay exceeds {max_ms}ms")]
    TypingDelayTooLong { max_ms: u64 },

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}

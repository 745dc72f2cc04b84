//! Configuration error types

use thiserror::Error;

use crate::domain::foundation::ValidationError as DomainValidationError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid AI setting: {0}")]
    InvalidAiSetting(&'static str),

    #[error("Invalid hint policy: {0}")]
    InvalidHintPolicy(#[from] DomainValidationError),

    #[error("Invalid registry setting: {0}")]
    InvalidRegistrySetting(&'static str),
}

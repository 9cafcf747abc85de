//! Application error types
//!
//! Unified error handling at the binary edge.

use crate::config::ConfigError;
use crate::telemetry::TracingError;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    // Telemetry errors
    #[error(transparent)]
    Telemetry(#[from] TracingError),

    // Connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    // Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get the process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            // EX_USAGE
            Self::InvalidInput(_) => 64,
            // EX_CONFIG
            Self::Config(_) | Self::Telemetry(_) => 78,
            // EX_UNAVAILABLE
            Self::Connection(_) => 69,
            // EX_SOFTWARE
            Self::Internal(_) => 70,
        }
    }

    /// Get error code for log output
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Telemetry(_) => "TELEMETRY_ERROR",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a connection error
    #[must_use]
    pub fn connection(msg: impl fmt::Display) -> Self {
        Self::Connection(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

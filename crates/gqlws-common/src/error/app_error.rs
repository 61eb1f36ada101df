//! Application error types
//!
//! Unified error handling for server bootstrap and runtime failures.

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Server lifecycle errors
    #[error("Server error: {0}")]
    Server(String),

    // Transport errors surfaced from the socket layer
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Server(err.to_string())
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

//! Handler error types

use gqlws_core::CloseCode;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Malformed or missing payload
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// More than one `connection_init` received
    #[error("Too many initialisation requests")]
    TooManyInitRequests,

    /// Init hook rejected the connection or timed out
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The session closed while the handler was running
    #[error("Session closed")]
    SessionClosed,
}

impl HandlerError {
    /// Convert to a close code, if one should be sent
    ///
    /// `None` means the connection is already gone and no close frame is
    /// warranted.
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::InvalidPayload(_) => Some(CloseCode::InvalidMessage),
            Self::TooManyInitRequests => Some(CloseCode::TooManyInitRequests),
            Self::Unauthorized(_) => Some(CloseCode::Unauthorized),
            Self::SessionClosed => None,
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

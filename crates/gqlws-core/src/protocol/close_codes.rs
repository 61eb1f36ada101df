//! WebSocket close codes
//!
//! Defines the application close codes the gateway uses as protocol-level signals.

use serde::{Deserialize, Serialize};

/// Gateway WebSocket close codes
///
/// These codes are sent when closing a WebSocket connection to indicate the reason.
/// The 44xx range is application-defined and layered on top of the standard
/// close mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Normal closure
    Normal = 1000,
    /// Malformed frame, unknown type, missing id, or message out of sequence
    InvalidMessage = 4400,
    /// Connection initialisation rejected by the authorization hook
    Unauthorized = 4401,
    /// No `connection_init` received within the configured timeout
    InitTimeout = 4408,
    /// A subscription is already registered under the requested id
    SubscriberAlreadyExists = 4409,
    /// More than one `connection_init` received
    TooManyInitRequests = 4429,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1000 => Some(Self::Normal),
            4400 => Some(Self::InvalidMessage),
            4401 => Some(Self::Unauthorized),
            4408 => Some(Self::InitTimeout),
            4409 => Some(Self::SubscriberAlreadyExists),
            4429 => Some(Self::TooManyInitRequests),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Check if this close code indicates client protocol misuse
    #[must_use]
    pub const fn is_protocol_violation(self) -> bool {
        matches!(
            self,
            Self::InvalidMessage | Self::SubscriberAlreadyExists | Self::TooManyInitRequests
        )
    }

    /// Get the description for this close code
    ///
    /// Sent as the close frame reason text.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Normal => "Normal closure",
            Self::InvalidMessage => "Invalid message",
            Self::Unauthorized => "Unauthorized",
            Self::InitTimeout => "Connection initialisation timeout",
            Self::SubscriberAlreadyExists => "Subscriber already exists",
            Self::TooManyInitRequests => "Too many initialisation requests",
        }
    }

    /// Get the name of this close code
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::InvalidMessage => "InvalidMessage",
            Self::Unauthorized => "Unauthorized",
            Self::InitTimeout => "InitTimeout",
            Self::SubscriberAlreadyExists => "SubscriberAlreadyExists",
            Self::TooManyInitRequests => "TooManyInitRequests",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.as_u16(), self.description())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}

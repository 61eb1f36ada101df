//! Message type tags
//!
//! Defines the string tags carried in the `type` field of every protocol message.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Protocol message types
///
/// Each WebSocket frame carries exactly one of these tags. Unknown tags
/// decode to [`MessageType::Unresolved`] so the state machine can close the
/// connection with an "invalid message" status instead of failing decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Connection initialisation request (client only)
    ConnectionInit,
    /// Connection acknowledgement (server only)
    ConnectionAck,
    /// Start a GraphQL operation (client only)
    Subscribe,
    /// Operation result, one per stream element (server only)
    Next,
    /// Terminal operation error (server only)
    Error,
    /// Operation finished (client: cancel, server: stream done)
    Complete,
    /// Keep-alive probe (either direction)
    Ping,
    /// Keep-alive reply (either direction)
    Pong,
    /// Sentinel for an unrecognized `type` tag
    Unresolved,
}

impl MessageType {
    /// Create a `MessageType` from its wire tag
    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "connection_init" => Some(Self::ConnectionInit),
            "connection_ack" => Some(Self::ConnectionAck),
            "subscribe" => Some(Self::Subscribe),
            "next" => Some(Self::Next),
            "error" => Some(Self::Error),
            "complete" => Some(Self::Complete),
            "ping" => Some(Self::Ping),
            "pong" => Some(Self::Pong),
            _ => None,
        }
    }

    /// Get the wire tag for this message type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionInit => "connection_init",
            Self::ConnectionAck => "connection_ack",
            Self::Subscribe => "subscribe",
            Self::Next => "next",
            Self::Error => "error",
            Self::Complete => "complete",
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::Unresolved => "unresolved",
        }
    }

    /// Check if this message type can be sent by the client
    #[must_use]
    pub const fn is_client_message(self) -> bool {
        matches!(
            self,
            Self::ConnectionInit | Self::Subscribe | Self::Complete | Self::Ping | Self::Pong
        )
    }

    /// Check if this message type can be sent by the server
    #[must_use]
    pub const fn is_server_message(self) -> bool {
        matches!(
            self,
            Self::ConnectionAck | Self::Next | Self::Error | Self::Complete | Self::Ping | Self::Pong
        )
    }

    /// Check if messages of this type must carry a non-null `id`
    ///
    /// `connection_init`/`connection_ack`/`ping`/`pong` never carry one.
    #[must_use]
    pub const fn requires_id(self) -> bool {
        matches!(self, Self::Subscribe | Self::Next | Self::Error | Self::Complete)
    }

    /// Get the name of this message type
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ConnectionInit => "ConnectionInit",
            Self::ConnectionAck => "ConnectionAck",
            Self::Subscribe => "Subscribe",
            Self::Next => "Next",
            Self::Error => "Error",
            Self::Complete => "Complete",
            Self::Ping => "Ping",
            Self::Pong => "Pong",
            Self::Unresolved => "Unresolved",
        }
    }
}

impl Serialize for MessageType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if *self == Self::Unresolved {
            return Err(serde::ser::Error::custom("cannot serialize an unresolved message type"));
        }
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MessageType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value).unwrap_or(Self::Unresolved))
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Protocol message envelope
//!
//! Defines the compact JSON envelope shared by all protocol messages.

use super::MessageType;
use crate::graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol message envelope
///
/// Every frame is a JSON object with an optional `id`, a required `type`
/// tag, and an optional `payload` whose shape depends on the type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Operation id (required for subscribe/next/error/complete)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Message type tag
    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Message payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl WsMessage {
    // === Client Messages ===

    /// Create a `connection_init` message
    #[must_use]
    pub fn connection_init(payload: Option<Value>) -> Self {
        Self {
            id: None,
            message_type: MessageType::ConnectionInit,
            payload,
        }
    }

    /// Create a `subscribe` message
    #[must_use]
    pub fn subscribe(id: impl Into<String>, request: &GraphQlRequest) -> Self {
        Self {
            id: Some(id.into()),
            message_type: MessageType::Subscribe,
            payload: serde_json::to_value(request).ok(),
        }
    }

    // === Server Messages ===

    /// Create a `connection_ack` message
    #[must_use]
    pub fn connection_ack(payload: Option<Value>) -> Self {
        Self {
            id: None,
            message_type: MessageType::ConnectionAck,
            payload,
        }
    }

    /// Create a `next` message carrying one execution result
    #[must_use]
    pub fn next(id: impl Into<String>, response: &GraphQlResponse) -> Self {
        Self {
            id: Some(id.into()),
            message_type: MessageType::Next,
            payload: serde_json::to_value(response).ok(),
        }
    }

    /// Create an `error` message carrying a structured error list
    #[must_use]
    pub fn error(id: impl Into<String>, errors: &[GraphQlError]) -> Self {
        Self {
            id: Some(id.into()),
            message_type: MessageType::Error,
            payload: serde_json::to_value(errors).ok(),
        }
    }

    /// Create a `complete` message
    #[must_use]
    pub fn complete(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            message_type: MessageType::Complete,
            payload: None,
        }
    }

    /// Create a `ping` message
    #[must_use]
    pub fn ping() -> Self {
        Self {
            id: None,
            message_type: MessageType::Ping,
            payload: None,
        }
    }

    /// Create a `pong` message
    #[must_use]
    pub fn pong() -> Self {
        Self {
            id: None,
            message_type: MessageType::Pong,
            payload: None,
        }
    }

    // === Parsing Client Messages ===

    /// Try to parse the payload as a GraphQL request (`subscribe` only)
    pub fn as_subscribe(&self) -> Option<GraphQlRequest> {
        if self.message_type != MessageType::Subscribe {
            return None;
        }
        self.payload.as_ref().and_then(|p| serde_json::from_value(p.clone()).ok())
    }

    /// Get the `connection_init` payload, if any
    pub fn init_payload(&self) -> Option<Value> {
        if self.message_type != MessageType::ConnectionInit {
            return None;
        }
        self.payload.clone()
    }

    // === Utilities ===

    /// Check the id-presence invariant for this message's type
    #[must_use]
    pub fn has_required_id(&self) -> bool {
        !self.message_type.requires_id() || self.id.as_ref().is_some_and(|id| !id.is_empty())
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for WsMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(id) = &self.id {
            write!(f, "WsMessage(type={}, id={id})", self.message_type)
        } else {
            write!(f, "WsMessage(type={})", self.message_type)
        }
    }
}

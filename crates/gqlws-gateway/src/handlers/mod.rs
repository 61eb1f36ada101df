//! Message type handlers
//!
//! Handles incoming WebSocket messages based on their type tag.

mod complete;
mod error;
mod init;
mod ping;
mod subscribe;

pub use complete::CompleteHandler;
pub use error::{HandlerError, HandlerResult};
pub use init::InitHandler;
pub use ping::PingHandler;
pub use subscribe::SubscribeHandler;

use crate::connection::Session;
use crate::server::GatewayState;
use gqlws_core::{CloseCode, MessageType, WsMessage};
use std::sync::Arc;

/// Dispatch incoming client messages to appropriate handlers
///
/// Performs the state-machine checks every message is subject to: only
/// client-sendable types, the id-presence invariant, and the
/// initialisation gate. Violations close the connection with an
/// "invalid message" status.
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client message
    pub async fn dispatch(
        state: &GatewayState,
        session: &Arc<Session>,
        message: WsMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        // a closed session processes nothing further
        if session.is_closed() {
            return Ok(None);
        }

        // unknown tags decode to the Unresolved sentinel, rejected here
        if !message.message_type.is_client_message() {
            tracing::warn!(
                session_id = %session.id(),
                message_type = %message.message_type,
                "Received non-client message type"
            );
            return Ok(Some(CloseCode::InvalidMessage));
        }

        if !message.has_required_id() {
            tracing::warn!(
                session_id = %session.id(),
                message_type = %message.message_type,
                "Message is missing its required id"
            );
            return Ok(Some(CloseCode::InvalidMessage));
        }

        // nothing but connection_init is processed before init
        if message.message_type != MessageType::ConnectionInit && !session.is_initialized() {
            tracing::warn!(
                session_id = %session.id(),
                message_type = %message.message_type,
                "Message received before connection_init"
            );
            return Ok(Some(CloseCode::InvalidMessage));
        }

        match message.message_type {
            MessageType::ConnectionInit => {
                InitHandler::handle(state, session, message.payload).await
            }
            MessageType::Subscribe => {
                let Some(id) = message.id.clone() else {
                    return Ok(Some(CloseCode::InvalidMessage));
                };
                SubscribeHandler::handle(state, session, id, &message).await
            }
            MessageType::Complete => {
                let Some(id) = message.id.as_deref() else {
                    return Ok(Some(CloseCode::InvalidMessage));
                };
                CompleteHandler::handle(session, id).await
            }
            MessageType::Ping => PingHandler::handle(session).await,
            MessageType::Pong => {
                tracing::trace!(session_id = %session.id(), "Pong received");
                Ok(None)
            }
            // server-only and unresolved types were rejected above
            _ => Ok(Some(CloseCode::InvalidMessage)),
        }
    }
}

//! Ping handler

use super::{HandlerError, HandlerResult};
use crate::connection::Session;
use gqlws_core::{CloseCode, WsMessage};
use std::sync::Arc;

/// Handles `ping` messages
pub struct PingHandler;

impl PingHandler {
    /// Reply with a `pong`
    ///
    /// The reply goes through the session's serial outbound queue, never
    /// inline to the socket.
    pub async fn handle(session: &Arc<Session>) -> HandlerResult<Option<CloseCode>> {
        tracing::trace!(session_id = %session.id(), "Ping received");

        if !session.send(WsMessage::pong()).await {
            return Err(HandlerError::SessionClosed);
        }

        Ok(None)
    }
}

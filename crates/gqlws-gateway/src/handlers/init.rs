//! Connection init handler

use super::{HandlerError, HandlerResult};
use crate::connection::Session;
use crate::keepalive::KeepAliveTask;
use crate::server::GatewayState;
use gqlws_core::{CloseCode, WsMessage};
use serde_json::Value;
use std::sync::Arc;

/// Handles `connection_init` messages
pub struct InitHandler;

impl InitHandler {
    /// Handle a `connection_init` message
    ///
    /// Stores the init payload exactly once, runs the authorization hook
    /// under its configured time bound, acknowledges with `connection_ack`,
    /// and starts the keep-alive task if one is configured.
    pub async fn handle(
        state: &GatewayState,
        session: &Arc<Session>,
        payload: Option<Value>,
    ) -> HandlerResult<Option<CloseCode>> {
        if !session.initialize(payload.clone()) {
            tracing::warn!(
                session_id = %session.id(),
                "Client sent connection_init more than once"
            );
            return Err(HandlerError::TooManyInitRequests);
        }

        // the hook must not hang the handshake indefinitely
        let hook = state.init_handler().handle_init(payload);
        let ack_payload = match tokio::time::timeout(state.config().init_handler_timeout(), hook).await
        {
            Ok(Ok(ack_payload)) => ack_payload,
            Ok(Err(rejected)) => {
                tracing::debug!(
                    session_id = %session.id(),
                    reason = %rejected.reason,
                    "Connection init rejected"
                );
                return Err(HandlerError::Unauthorized(rejected.reason));
            }
            Err(_) => {
                tracing::warn!(
                    session_id = %session.id(),
                    "Connection init handler timed out"
                );
                return Err(HandlerError::Unauthorized("init handler timed out".to_string()));
            }
        };

        if !session.send(WsMessage::connection_ack(ack_payload)).await {
            return Err(HandlerError::SessionClosed);
        }

        if let Some(interval) = state.config().keep_alive_interval() {
            session.set_keep_alive(KeepAliveTask::spawn(session.clone(), interval));
        }

        tracing::info!(session_id = %session.id(), "Connection initialised");

        Ok(None)
    }
}

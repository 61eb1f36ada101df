//! Complete handler

use super::HandlerResult;
use crate::connection::Session;
use gqlws_core::CloseCode;
use std::sync::Arc;

/// Handles client `complete` messages
pub struct CompleteHandler;

impl CompleteHandler {
    /// Cancel and remove the subscription registered under `id`
    ///
    /// Idempotent: an unknown or already-completed id is a no-op.
    pub async fn handle(session: &Arc<Session>, id: &str) -> HandlerResult<Option<CloseCode>> {
        if let Some(handle) = session.subscriptions().remove(id) {
            handle.cancel();
            tracing::debug!(
                session_id = %session.id(),
                operation_id = %id,
                "Subscription cancelled by client"
            );
        } else {
            tracing::trace!(
                session_id = %session.id(),
                operation_id = %id,
                "Complete for unknown operation ignored"
            );
        }

        Ok(None)
    }
}

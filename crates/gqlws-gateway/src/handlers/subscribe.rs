//! Subscribe handler
//!
//! Executes GraphQL operations and forwards their results as protocol
//! frames. Each operation runs as an independent task; all of its frames
//! go through the session's serial outbound queue.

use super::{HandlerError, HandlerResult};
use crate::connection::{Session, SubscriptionHandle};
use crate::server::GatewayState;
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use futures::StreamExt;
use gqlws_core::{CloseCode, ExecutionOutcome, ResponseStream, WsMessage};
use std::sync::Arc;

/// Handles `subscribe` messages
pub struct SubscribeHandler;

impl SubscribeHandler {
    /// Handle a `subscribe` message
    ///
    /// Spawns the execution so a long-lived subscription never blocks the
    /// receive loop; the next inbound frame can be processed while this
    /// operation is still streaming.
    pub async fn handle(
        state: &GatewayState,
        session: &Arc<Session>,
        id: String,
        message: &WsMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        let Some(request) = message.as_subscribe() else {
            return Err(HandlerError::InvalidPayload(
                "subscribe payload is not a GraphQL request".to_string(),
            ));
        };

        tracing::debug!(
            session_id = %session.id(),
            operation_id = %id,
            "Starting GraphQL operation"
        );

        let engine = Arc::clone(state.engine());
        let session = Arc::clone(session);
        let (abort_handle, abort_registration) = AbortHandle::new_pair();

        tokio::spawn(async move {
            match engine.execute(request).await {
                ExecutionOutcome::Single(response) => {
                    // query/mutation: execution errors travel in-band in the
                    // response payload, still followed by complete
                    if session.send(WsMessage::next(&id, &response)).await {
                        session.send(WsMessage::complete(&id)).await;
                    }
                }
                ExecutionOutcome::Stream(stream) => {
                    Self::forward_stream(&session, &id, stream, abort_handle, abort_registration)
                        .await;
                }
            }
        });

        Ok(None)
    }

    /// Register the subscription and forward its stream
    async fn forward_stream(
        session: &Arc<Session>,
        id: &str,
        stream: ResponseStream,
        abort_handle: AbortHandle,
        abort_registration: AbortRegistration,
    ) {
        let handle = SubscriptionHandle::new(abort_handle);
        let token = handle.token();
        if session.subscriptions().register(id, handle).is_err() {
            tracing::warn!(
                session_id = %session.id(),
                operation_id = %id,
                "Duplicate subscription id"
            );
            session.close(CloseCode::SubscriberAlreadyExists).await;
            return;
        }

        let forward = Self::forward_frames(session, id, stream);

        // aborted by a client complete or session teardown; either way the
        // stream is dropped here, releasing the upstream producer
        if Abortable::new(forward, abort_registration).await.is_ok() {
            // natural completion: whoever cancels also removes, so only the
            // uncancelled path cleans up, and only its own registration
            session.subscriptions().remove_matching(id, token);
        }
    }

    async fn forward_frames(session: &Arc<Session>, id: &str, mut stream: ResponseStream) {
        while let Some(item) = stream.next().await {
            match item {
                Ok(response) => {
                    if !session.send(WsMessage::next(id, &response)).await {
                        return;
                    }
                }
                Err(err) => {
                    // terminal: one error frame, then nothing further for this id
                    tracing::debug!(
                        session_id = %session.id(),
                        operation_id = %id,
                        "Subscription stream failed"
                    );
                    session.send(WsMessage::error(id, &err.errors)).await;
                    return;
                }
            }
        }

        // an empty stream still completes
        session.send(WsMessage::complete(id)).await;
        tracing::debug!(
            session_id = %session.id(),
            operation_id = %id,
            "Subscription completed"
        );
    }
}

//! Keep-alive scheduler
//!
//! Sends periodic ping frames on otherwise idle connections. Started only
//! after a successful `connection_init` and torn down with the session.

use crate::connection::Session;
use futures::future::{AbortHandle, Abortable};
use gqlws_core::WsMessage;
use std::sync::Arc;
use std::time::Duration;

/// Per-session keep-alive task
pub struct KeepAliveTask;

impl KeepAliveTask {
    /// Spawn the keep-alive loop for a session
    ///
    /// Each tick is edge-triggered: if a `next` frame was sent since the
    /// previous tick the heartbeat is suppressed, so active streams never
    /// carry redundant pings. Returns the handle used to stop the loop at
    /// session teardown.
    pub fn spawn(session: Arc<Session>, interval: Duration) -> AbortHandle {
        let (abort_handle, abort_registration) = AbortHandle::new_pair();

        let task = async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;

                if session.take_activity() {
                    tracing::trace!(
                        session_id = %session.id(),
                        "Keep-alive suppressed by recent traffic"
                    );
                    continue;
                }

                if !session.send(WsMessage::ping()).await {
                    break;
                }
                tracing::trace!(session_id = %session.id(), "Keep-alive ping sent");
            }
        };

        tokio::spawn(Abortable::new(task, abort_registration));

        abort_handle
    }
}

//! Individual WebSocket session
//!
//! Represents a single connection and its protocol state.

use super::SubscriptionRegistry;
use futures::future::AbortHandle;
use gqlws_core::{CloseCode, MessageType, WsMessage};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Connection established, waiting for `connection_init`
    AwaitingInit,
    /// Successfully initialised
    Active,
    /// Connection is closed (terminal)
    Closed,
}

/// An item on the serial outbound queue
///
/// A single drain task owns the socket sink and processes these in order,
/// so one frame is fully written before the next begins.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// A protocol frame to serialize and write
    Frame(WsMessage),
    /// Close the connection with the given status
    Close(CloseCode),
}

/// A single WebSocket session
pub struct Session {
    /// Unique session ID
    id: String,

    /// Current lifecycle phase
    phase: RwLock<SessionPhase>,

    /// Client init payload (absent until `connection_init`, set once)
    init_payload: Mutex<Option<Value>>,

    /// Serial outbound queue
    sender: mpsc::Sender<Outbound>,

    /// Whether a `next` frame was enqueued since the last keep-alive tick
    sent_next_since_tick: AtomicBool,

    /// Live subscriptions by operation id
    subscriptions: SubscriptionRegistry,

    /// Keep-alive task handle, present once keep-alive starts
    keep_alive: Mutex<Option<AbortHandle>>,

    /// Session creation time
    created_at: Instant,
}

impl Session {
    /// Create a new session in the `AwaitingInit` phase
    pub fn new(sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            id: uuid::Uuid::new_v4().to_string(),
            phase: RwLock::new(SessionPhase::AwaitingInit),
            init_payload: Mutex::new(None),
            sender,
            sent_next_since_tick: AtomicBool::new(false),
            subscriptions: SubscriptionRegistry::new(),
            keep_alive: Mutex::new(None),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the current phase
    pub fn phase(&self) -> SessionPhase {
        *self.phase.read()
    }

    /// Check if `connection_init` has been accepted
    pub fn is_initialized(&self) -> bool {
        self.phase() == SessionPhase::Active
    }

    /// Check if the session is closed
    pub fn is_closed(&self) -> bool {
        self.phase() == SessionPhase::Closed
    }

    /// Accept `connection_init`, storing its payload exactly once
    ///
    /// Atomic test-and-set: when two init messages race, exactly one call
    /// returns `true`; the loser must close the connection.
    pub fn initialize(&self, payload: Option<Value>) -> bool {
        let mut phase = self.phase.write();
        if *phase != SessionPhase::AwaitingInit {
            return false;
        }
        *phase = SessionPhase::Active;
        *self.init_payload.lock() = payload;
        true
    }

    /// Get the stored init payload, if any
    pub fn init_payload(&self) -> Option<Value> {
        self.init_payload.lock().clone()
    }

    /// Enqueue a frame on the serial outbound queue
    ///
    /// Returns `false` if the session is closed or the queue is gone.
    pub async fn send(&self, frame: WsMessage) -> bool {
        if self.is_closed() {
            return false;
        }
        if frame.message_type == MessageType::Next {
            self.sent_next_since_tick.store(true, Ordering::Release);
        }
        self.sender.send(Outbound::Frame(frame)).await.is_ok()
    }

    /// Close the connection with a protocol status
    ///
    /// The close frame travels through the serial queue, after any frames
    /// already enqueued. The first close wins; later calls are no-ops.
    pub async fn close(&self, code: CloseCode) {
        {
            let mut phase = self.phase.write();
            if *phase == SessionPhase::Closed {
                return;
            }
            *phase = SessionPhase::Closed;
        }
        tracing::debug!(session_id = %self.id, close_code = %code, "Closing session");
        let _ = self.sender.send(Outbound::Close(code)).await;
    }

    /// Consume the keep-alive activity flag
    ///
    /// Returns `true` if a `next` frame was enqueued since the last call.
    pub fn take_activity(&self) -> bool {
        self.sent_next_since_tick.swap(false, Ordering::AcqRel)
    }

    /// Get the subscription registry
    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    /// Attach the keep-alive task handle
    pub fn set_keep_alive(&self, handle: AbortHandle) {
        *self.keep_alive.lock() = Some(handle);
    }

    /// Tear the session down
    ///
    /// Cancels every live subscription, stops the keep-alive task, and
    /// marks the session closed. Idempotent.
    pub fn dispose(&self) {
        *self.phase.write() = SessionPhase::Closed;
        if let Some(handle) = self.keep_alive.lock().take() {
            handle.abort();
        }
        self.subscriptions.dispose_all();
    }

    /// Get session age
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

//! Execution seams (ports) - define the capabilities the gateway consumes
//!
//! The protocol layer treats GraphQL execution and connection authorization
//! as opaque capabilities. The gateway defines what it needs here, and the
//! embedding application provides the implementation.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;
use thiserror::Error;

use crate::graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};

/// An asynchronous stream of subscription results
///
/// A failing stream terminates with the structured error list that becomes
/// the operation's `error` frame.
pub type ResponseStream = BoxStream<'static, Result<GraphQlResponse, SubscriptionError>>;

/// Outcome of executing a GraphQL request
pub enum ExecutionOutcome {
    /// A query or mutation resolved to a single result
    Single(GraphQlResponse),
    /// A subscription resolved to a result stream
    Stream(ResponseStream),
}

impl ExecutionOutcome {
    /// Wrap a single result
    #[must_use]
    pub fn single(response: GraphQlResponse) -> Self {
        Self::Single(response)
    }

    /// Wrap a result stream
    #[must_use]
    pub fn stream(stream: ResponseStream) -> Self {
        Self::Stream(stream)
    }
}

impl std::fmt::Debug for ExecutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(response) => f.debug_tuple("Single").field(response).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").field(&"..").finish(),
        }
    }
}

/// Terminal failure of a subscription stream
#[derive(Debug, Clone, Error)]
#[error("subscription failed: {}", first_message(&self.errors))]
pub struct SubscriptionError {
    /// Structured error list delivered in the `error` frame
    pub errors: Vec<GraphQlError>,
}

impl SubscriptionError {
    /// Create a stream error from an error list
    #[must_use]
    pub fn new(errors: Vec<GraphQlError>) -> Self {
        Self { errors }
    }
}

impl From<GraphQlError> for SubscriptionError {
    fn from(error: GraphQlError) -> Self {
        Self { errors: vec![error] }
    }
}

fn first_message(errors: &[GraphQlError]) -> &str {
    errors.first().map_or("unknown error", |e| e.message.as_str())
}

/// GraphQL execution engine
///
/// Engine-level request failures are expressed as a `Single` response with
/// a populated `errors` array; they travel in-band as a `next` frame, not
/// as a protocol error.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Execute a GraphQL request
    async fn execute(&self, request: GraphQlRequest) -> ExecutionOutcome;
}

/// Rejection produced by a [`ConnectionInitHandler`]
#[derive(Debug, Clone, Error)]
#[error("connection init rejected: {reason}")]
pub struct InitRejected {
    /// Reason, surfaced in logs only (never to the client)
    pub reason: String,
}

impl InitRejected {
    /// Create a rejection with a reason
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Connection-initialization hook
///
/// Invoked with the client's `connection_init` payload. Returning `Ok`
/// acknowledges the connection, optionally with a payload carried in the
/// `connection_ack` frame; returning `Err` closes it as unauthorized.
#[async_trait]
pub trait ConnectionInitHandler: Send + Sync {
    /// Validate an init payload and produce the ack payload
    async fn handle_init(&self, payload: Option<Value>) -> Result<Option<Value>, InitRejected>;
}

/// Default init handler that accepts every connection without an ack payload
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllInitHandler;

#[async_trait]
impl ConnectionInitHandler for AcceptAllInitHandler {
    async fn handle_init(&self, _payload: Option<Value>) -> Result<Option<Value>, InitRejected> {
        Ok(None)
    }
}

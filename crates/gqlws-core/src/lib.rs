//! # gqlws-core
//!
//! Protocol types and execution seams for the GraphQL-over-WebSocket gateway.
//!
//! This crate defines the wire-level message envelope shared by both
//! GraphQL-over-WebSocket sub-protocols, the application close codes the
//! gateway uses as protocol signals, and the capability traits the server
//! consumes: a GraphQL execution engine and a connection-initialization
//! (authorization) hook.

pub mod engine;
pub mod graphql;
pub mod protocol;

pub use engine::{
    AcceptAllInitHandler, ConnectionInitHandler, ExecutionEngine, ExecutionOutcome, InitRejected,
    ResponseStream, SubscriptionError,
};
pub use graphql::{ErrorLocation, GraphQlError, GraphQlRequest, GraphQlResponse};
pub use protocol::{
    CloseCode, MessageType, WsMessage, GRAPHQL_TRANSPORT_WS_PROTOCOL, GRAPHQL_WS_PROTOCOL,
    SUPPORTED_SUBPROTOCOLS,
};

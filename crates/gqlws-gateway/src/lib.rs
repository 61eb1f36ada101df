//! # gqlws-gateway
//!
//! GraphQL-over-WebSocket gateway server.
//!
//! Implements the protocol state machine once, against the execution-engine
//! and init-hook seams defined in `gqlws-core`, and binds it to an axum
//! WebSocket transport. Every outbound frame for a session travels through
//! a single serial write queue, so concurrently-running subscriptions can
//! never interleave their frames on the wire.

pub mod connection;
pub mod handlers;
pub mod keepalive;
pub mod server;

pub use connection::{Outbound, Session, SessionPhase, SubscriptionHandle, SubscriptionRegistry};
pub use server::{create_app, create_router, gateway_handler, run, run_server, GatewayState};

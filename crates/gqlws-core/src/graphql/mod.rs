//! GraphQL execution payload types
//!
//! Request and response shapes carried inside `subscribe`, `next`, and
//! `error` message payloads.

mod request;
mod response;

pub use request::GraphQlRequest;
pub use response::{ErrorLocation, GraphQlError, GraphQlResponse};

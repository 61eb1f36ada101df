//! Per-connection state
//!
//! The session owns the serial outbound queue and the registry of live
//! subscriptions for one physical connection.

mod registry;
mod session;

pub use registry::{AlreadyRegistered, SubscriptionHandle, SubscriptionRegistry};
pub use session::{Outbound, Session, SessionPhase};

//! Gateway state
//!
//! Application state for the gateway server.

use gqlws_common::GatewayConfig;
use gqlws_core::{AcceptAllInitHandler, ConnectionInitHandler, ExecutionEngine};
use std::sync::Arc;

/// Gateway application state
///
/// Holds the capabilities the protocol state machine consumes: the GraphQL
/// execution engine, the connection-init hook, and the configuration.
#[derive(Clone)]
pub struct GatewayState {
    /// GraphQL execution engine
    engine: Arc<dyn ExecutionEngine>,
    /// Connection-initialization (authorization) hook
    init_handler: Arc<dyn ConnectionInitHandler>,
    /// Gateway configuration
    config: Arc<GatewayConfig>,
}

impl GatewayState {
    /// Create gateway state with the default accept-all init handler
    pub fn new(engine: Arc<dyn ExecutionEngine>, config: GatewayConfig) -> Self {
        Self {
            engine,
            init_handler: Arc::new(AcceptAllInitHandler),
            config: Arc::new(config),
        }
    }

    /// Replace the connection-init handler
    #[must_use]
    pub fn with_init_handler(mut self, init_handler: Arc<dyn ConnectionInitHandler>) -> Self {
        self.init_handler = init_handler;
        self
    }

    /// Get the execution engine
    pub fn engine(&self) -> &Arc<dyn ExecutionEngine> {
        &self.engine
    }

    /// Get the connection-init handler
    pub fn init_handler(&self) -> &Arc<dyn ConnectionInitHandler> {
        &self.init_handler
    }

    /// Get the gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("config", &self.config)
            .finish()
    }
}

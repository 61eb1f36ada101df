//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use axum::{routing::get, Router};
use gqlws_common::{AppError, AppResult};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/graphql", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the gateway server on the given address
pub async fn run_server(app: Router, addr: SocketAddr) -> AppResult<()> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/graphql", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Server(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server from its state
pub async fn run(state: GatewayState) -> AppResult<()> {
    let addr: SocketAddr = state
        .config()
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid bind address: {e}")))?;

    let app = create_app(state);

    run_server(app, addr).await
}

//! WebSocket handler
//!
//! Binds the protocol state machine to the axum WebSocket transport.

use crate::connection::{Outbound, Session};
use crate::handlers::MessageDispatcher;
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use gqlws_core::{CloseCode, WsMessage, SUPPORTED_SUBPROTOCOLS};
use std::sync::Arc;
use tokio::sync::mpsc;

/// WebSocket gateway handler
///
/// Negotiates one of the two GraphQL-over-WebSocket sub-protocol
/// identifiers during the upgrade.
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.protocols(SUPPORTED_SUBPROTOCOLS)
        .on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let (tx, rx) = mpsc::channel::<Outbound>(state.config().outbound_buffer);
    let session = Session::new(tx);

    tracing::info!(session_id = %session.id(), "WebSocket connection established");

    let (ws_sink, ws_stream) = socket.split();

    // single drain task owns the sink: outbound frames are serialized
    let send_task = tokio::spawn(drain_outbound(rx, ws_sink, session.id().to_string()));

    let state_recv = state.clone();
    let session_recv = session.clone();
    let recv_task = tokio::spawn(async move {
        receive_loop(state_recv, session_recv, ws_stream).await;
    });

    // the init timeout races against the first connection_init
    let session_timeout = session.clone();
    let init_timeout = state.config().connection_init_timeout();
    let timeout_task = tokio::spawn(async move {
        tokio::time::sleep(init_timeout).await;
        if !session_timeout.is_initialized() && !session_timeout.is_closed() {
            tracing::warn!(
                session_id = %session_timeout.id(),
                "No connection_init within the configured timeout"
            );
            session_timeout.close(CloseCode::InitTimeout).await;
        }
    });

    tokio::select! {
        _ = recv_task => {
            tracing::debug!(session_id = %session.id(), "Receive task ended");
        }
        _ = send_task => {
            tracing::debug!(session_id = %session.id(), "Send task ended");
        }
    }

    timeout_task.abort();
    session.dispose();

    tracing::info!(
        session_id = %session.id(),
        age_ms = session.age().as_millis(),
        "Connection closed"
    );
}

/// Drain the serial outbound queue into the socket sink
///
/// Stops after writing a close frame or when every sender is gone.
async fn drain_outbound(
    mut rx: mpsc::Receiver<Outbound>,
    mut ws_sink: SplitSink<WebSocket, Message>,
    session_id: String,
) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Frame(frame) => {
                let json = match frame.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(
                            session_id = %session_id,
                            error = %e,
                            "Failed to serialize outbound frame"
                        );
                        continue;
                    }
                };
                if let Err(e) = ws_sink.send(Message::Text(json)).await {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "Failed to write frame to WebSocket"
                    );
                    break;
                }
            }
            Outbound::Close(code) => {
                let frame = CloseFrame {
                    code: code.as_u16(),
                    reason: code.description().into(),
                };
                if let Err(e) = ws_sink.send(Message::Close(Some(frame))).await {
                    tracing::debug!(
                        session_id = %session_id,
                        error = %e,
                        "Failed to write close frame"
                    );
                }
                break;
            }
        }
    }

    let _ = ws_sink.close().await;
}

/// Process inbound frames until the connection ends
async fn receive_loop(state: GatewayState, session: Arc<Session>, mut ws_stream: SplitStream<WebSocket>) {
    while let Some(frame) = ws_stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if !handle_text_frame(&state, &session, &text).await {
                    return;
                }
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(session_id = %session.id(), "Binary frames not supported");
                session.close(CloseCode::InvalidMessage).await;
                return;
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // transport-level ping/pong is handled by axum
                tracing::trace!(session_id = %session.id(), "Transport ping/pong");
            }
            Ok(Message::Close(_)) => {
                tracing::info!(session_id = %session.id(), "Client closed connection");
                return;
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %e,
                    "WebSocket transport error"
                );
                return;
            }
        }
    }
}

/// Handle one text frame; returns `false` when the loop should stop
async fn handle_text_frame(state: &GatewayState, session: &Arc<Session>, text: &str) -> bool {
    let message = match WsMessage::from_json(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(
                session_id = %session.id(),
                error = %e,
                "Failed to parse message"
            );
            session.close(CloseCode::InvalidMessage).await;
            return false;
        }
    };

    tracing::trace!(
        session_id = %session.id(),
        message_type = %message.message_type,
        "Received message"
    );

    match MessageDispatcher::dispatch(state, session, message).await {
        Ok(None) => true,
        Ok(Some(close_code)) => {
            session.close(close_code).await;
            false
        }
        Err(e) => {
            if let Some(close_code) = e.to_close_code() {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %e,
                    close_code = %close_code,
                    "Handler error"
                );
                session.close(close_code).await;
            }
            false
        }
    }
}

//! Gateway integration tests
//!
//! End-to-end protocol tests driving a real server over a WebSocket client.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use gqlws_common::GatewayConfig;
use gqlws_core::{GraphQlRequest, MessageType, WsMessage, GRAPHQL_WS_PROTOCOL};
use gqlws_gateway::GatewayState;
use integration_tests::{
    EchoInitHandler, HangingInitHandler, RejectingInitHandler, StubEngine, TestClient, TestServer,
    QUERY_ANSWER, QUERY_FAILS, SUBSCRIPTION_BROKEN, SUBSCRIPTION_FOREVER, SUBSCRIPTION_LETTERS,
    SUBSCRIPTION_SILENCE,
};
use serde_json::json;

fn subscribe_frame(id: &str, query: &str) -> WsMessage {
    WsMessage::subscribe(id, &GraphQlRequest::new(query))
}

// ============================================================================
// Handshake Tests
// ============================================================================

#[tokio::test]
async fn test_init_then_ack() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    let ack = client.init(Some(json!({}))).await.unwrap();

    assert_eq!(ack.message_type, MessageType::ConnectionAck);
    assert!(ack.id.is_none());
}

#[tokio::test]
async fn test_subprotocol_negotiation() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();

    let client = server.connect().await.unwrap();
    assert_eq!(client.negotiated_protocol.as_deref(), Some("graphql-transport-ws"));

    // the legacy identifier is still accepted at the handshake
    let legacy = TestClient::connect(&server.ws_url(), GRAPHQL_WS_PROTOCOL)
        .await
        .unwrap();
    assert_eq!(legacy.negotiated_protocol.as_deref(), Some("graphql-ws"));
}

#[tokio::test]
async fn test_ack_carries_hook_payload() {
    let state = GatewayState::new(Arc::new(StubEngine), GatewayConfig::default())
        .with_init_handler(Arc::new(EchoInitHandler));
    let server = TestServer::start_with_state(state).await.unwrap();
    let mut client = server.connect().await.unwrap();

    let ack = client.init(Some(json!({"role": "admin"}))).await.unwrap();

    assert_eq!(ack.payload, Some(json!({"role": "admin"})));
}

#[tokio::test]
async fn test_rejected_init_closes_4401() {
    let state = GatewayState::new(Arc::new(StubEngine), GatewayConfig::default())
        .with_init_handler(Arc::new(RejectingInitHandler));
    let server = TestServer::start_with_state(state).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send(&WsMessage::connection_init(None)).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4401);
}

#[tokio::test]
async fn test_hanging_init_hook_closes_4401() {
    let config = GatewayConfig {
        init_handler_timeout_secs: 1,
        ..GatewayConfig::default()
    };
    let state = GatewayState::new(Arc::new(StubEngine), config)
        .with_init_handler(Arc::new(HangingInitHandler));
    let server = TestServer::start_with_state(state).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send(&WsMessage::connection_init(None)).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4401);
}

#[tokio::test]
async fn test_double_init_closes_4429() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client.send(&WsMessage::connection_init(None)).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4429);
}

#[tokio::test]
async fn test_init_timeout_closes_4408() {
    let config = GatewayConfig {
        connection_init_timeout_secs: 1,
        ..GatewayConfig::default()
    };
    let state = GatewayState::new(Arc::new(StubEngine), config);
    let server = TestServer::start_with_state(state).await.unwrap();
    let mut client = server.connect().await.unwrap();

    let started = Instant::now();
    let code = client.expect_close().await.unwrap();

    assert_eq!(code, 4408);
    // closed after the timeout elapsed, within a bounded margin
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(900), "closed too early: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "closed too late: {elapsed:?}");
}

// ============================================================================
// State Machine Tests
// ============================================================================

#[tokio::test]
async fn test_pre_init_subscribe_closes_4400() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send(&subscribe_frame("1", QUERY_ANSWER)).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4400);
}

#[tokio::test]
async fn test_pre_init_ping_closes_4400() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send(&WsMessage::ping()).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4400);
}

#[tokio::test]
async fn test_unknown_type_closes_4400() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client.send_raw(r#"{"type":"start","id":"1"}"#).await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4400);
}

#[tokio::test]
async fn test_missing_id_closes_4400() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client
        .send_raw(r#"{"type":"subscribe","payload":{"query":"{ answer }"}}"#)
        .await
        .unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4400);
}

#[tokio::test]
async fn test_malformed_json_closes_4400() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client.send_raw("not json at all").await.unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4400);
}

#[tokio::test]
async fn test_ping_pong() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client.assert_alive().await.unwrap();
}

// ============================================================================
// Operation Tests
// ============================================================================

#[tokio::test]
async fn test_query_emits_next_then_complete() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client.send(&subscribe_frame("1", QUERY_ANSWER)).await.unwrap();

    let next = client.expect_frame(MessageType::Next).await.unwrap();
    assert_eq!(next.id.as_deref(), Some("1"));
    assert_eq!(next.payload.as_ref().unwrap()["data"]["answer"], 42);

    let complete = client.expect_frame(MessageType::Complete).await.unwrap();
    assert_eq!(complete.id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_query_error_travels_in_band() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(Some(json!({}))).await.unwrap();
    client.send(&subscribe_frame("1", QUERY_FAILS)).await.unwrap();

    // a failed query is still a next frame with a populated errors array
    let next = client.expect_frame(MessageType::Next).await.unwrap();
    assert_eq!(next.payload.as_ref().unwrap()["errors"][0]["message"], "bad");

    let complete = client.expect_frame(MessageType::Complete).await.unwrap();
    assert_eq!(complete.id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_subscription_stream_in_order() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client
        .send(&subscribe_frame("1", SUBSCRIPTION_LETTERS))
        .await
        .unwrap();

    let first = client.expect_frame(MessageType::Next).await.unwrap();
    assert_eq!(first.id.as_deref(), Some("1"));
    assert_eq!(first.payload.as_ref().unwrap()["data"]["letters"], "A");

    let second = client.expect_frame(MessageType::Next).await.unwrap();
    assert_eq!(second.payload.as_ref().unwrap()["data"]["letters"], "B");

    let complete = client.expect_frame(MessageType::Complete).await.unwrap();
    assert_eq!(complete.id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_empty_subscription_still_completes() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client
        .send(&subscribe_frame("1", SUBSCRIPTION_SILENCE))
        .await
        .unwrap();

    let complete = client.expect_frame(MessageType::Complete).await.unwrap();
    assert_eq!(complete.id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_subscription_error_ends_with_error_frame() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client
        .send(&subscribe_frame("1", SUBSCRIPTION_BROKEN))
        .await
        .unwrap();

    let next = client.expect_frame(MessageType::Next).await.unwrap();
    assert_eq!(next.payload.as_ref().unwrap()["data"]["broken"], "A");

    let error = client.expect_frame(MessageType::Error).await.unwrap();
    assert_eq!(error.id.as_deref(), Some("1"));
    assert_eq!(error.payload.as_ref().unwrap()[0]["message"], "stream broke");

    // the connection stays open for other operations
    client.assert_alive().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_subscription_id_closes_4409() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client
        .send(&subscribe_frame("1", SUBSCRIPTION_FOREVER))
        .await
        .unwrap();
    // let the first operation register before contesting the id
    client.assert_alive().await.unwrap();

    client
        .send(&subscribe_frame("1", SUBSCRIPTION_FOREVER))
        .await
        .unwrap();

    assert_eq!(client.expect_close().await.unwrap(), 4409);
}

#[tokio::test]
async fn test_complete_for_unknown_id_is_noop() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client.send(&WsMessage::complete("9")).await.unwrap();
    client.send(&WsMessage::complete("9")).await.unwrap();

    client.assert_alive().await.unwrap();
}

#[tokio::test]
async fn test_complete_cancels_and_releases_id() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    client
        .send(&subscribe_frame("1", SUBSCRIPTION_FOREVER))
        .await
        .unwrap();
    client.assert_alive().await.unwrap();
    // give the spawned operation time to register before cancelling it
    tokio::time::sleep(Duration::from_millis(100)).await;

    client.send(&WsMessage::complete("1")).await.unwrap();
    client.assert_alive().await.unwrap();

    // the id is free again: re-subscribing does not trip the duplicate check
    client
        .send(&subscribe_frame("1", SUBSCRIPTION_FOREVER))
        .await
        .unwrap();
    client.assert_alive().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_operations_stay_ordered_per_id() {
    let server = TestServer::start(Arc::new(StubEngine)).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();
    // a long-lived subscription plus a short query on another id
    client
        .send(&subscribe_frame("1", SUBSCRIPTION_FOREVER))
        .await
        .unwrap();
    client.send(&subscribe_frame("2", QUERY_ANSWER)).await.unwrap();

    let next = client.expect_frame(MessageType::Next).await.unwrap();
    assert_eq!(next.id.as_deref(), Some("2"));

    let complete = client.expect_frame(MessageType::Complete).await.unwrap();
    assert_eq!(complete.id.as_deref(), Some("2"));

    client.assert_alive().await.unwrap();
}

// ============================================================================
// Keep-Alive Tests
// ============================================================================

#[tokio::test]
async fn test_idle_connection_receives_keep_alive_ping() {
    let config = GatewayConfig {
        keep_alive_interval_secs: Some(1),
        ..GatewayConfig::default()
    };
    let state = GatewayState::new(Arc::new(StubEngine), config);
    let server = TestServer::start_with_state(state).await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.init(None).await.unwrap();

    let ping = client.expect_frame(MessageType::Ping).await.unwrap();
    assert!(ping.id.is_none());

    // answering is optional but must not upset the session
    client.send(&WsMessage::pong()).await.unwrap();
    client.assert_alive().await.unwrap();
}

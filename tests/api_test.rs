//! Tests for the HTTP API surface

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use skyrelay::api::{handlers::AppState, RelayApi};
use skyrelay::config::Config;
use skyrelay::relay::RelaySession;
use tokio::net::UdpSocket;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tower::ServiceExt;

fn test_router() -> Router {
    let state = AppState::new(
        Arc::new(RelaySession::new(Duration::from_secs(2))),
        Arc::new(RwLock::new(Config::default())),
    );
    RelayApi::create_router(state)
}

async fn request_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn service_info_reports_online() {
    let app = test_router();
    let (status, body) = request_json(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn connect_send_disconnect_flow() {
    let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = test_router();

    // Connect to the stand-in drone
    let (status, body) = request_json(
        &app,
        "POST",
        "/api/drone/connect",
        Some(json!({ "host": addr.ip().to_string(), "port": addr.port() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
    assert_eq!(body["port"], addr.port());

    // Status shows the recorded target
    let (status, body) = request_json(&app, "GET", "/api/drone/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
    assert_eq!(body["host"], addr.ip().to_string());
    assert_eq!(body["port"], addr.port());

    // Send three bytes and verify they arrive verbatim
    let encoded = general_purpose::STANDARD.encode([0x01, 0x02, 0x03]);
    let (status, body) = request_json(
        &app,
        "POST",
        "/api/drone/send",
        Some(json!({ "data": encoded })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sent"], true);
    assert_eq!(body["bytes"], 3);

    let mut buf = [0u8; 16];
    let (len, _) = timeout(Duration::from_secs(2), listener.recv_from(&mut buf))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(&buf[..len], &[0x01, 0x02, 0x03]);

    // Disconnect and confirm the session is gone
    let (status, body) = request_json(&app, "POST", "/api/drone/disconnect", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["disconnected"], true);

    let (status, body) = request_json(&app, "GET", "/api/drone/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);
    assert!(body.get("host").is_none());
    assert!(body.get("port").is_none());
}

#[tokio::test]
async fn connect_without_body_uses_configured_defaults() {
    let app = test_router();

    let (status, body) = request_json(&app, "POST", "/api/drone/connect", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
    assert_eq!(body["host"], "192.168.4.1");
    assert_eq!(body["port"], 2390);
}

#[tokio::test]
async fn send_while_disconnected_returns_conflict() {
    let app = test_router();

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/drone/send",
        Some(json!({ "data": "AQID" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "precondition");
}

#[tokio::test]
async fn malformed_payload_returns_bad_request() {
    let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = test_router();

    request_json(
        &app,
        "POST",
        "/api/drone/connect",
        Some(json!({ "host": addr.ip().to_string(), "port": addr.port() })),
    )
    .await;

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/drone/send",
        Some(json!({ "data": "***" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "payload_format");

    // The failed send must not tear down the link
    let (_, body) = request_json(&app, "GET", "/api/drone/status", None).await;
    assert_eq!(body["connected"], true);
}

#[tokio::test]
async fn unresolvable_host_returns_bad_gateway() {
    let app = test_router();

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/drone/connect",
        Some(json!({ "host": "nonexistent.invalid", "port": 2390 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "transport_acquisition");

    let (_, body) = request_json(&app, "GET", "/api/drone/status", None).await;
    assert_eq!(body["connected"], false);
}

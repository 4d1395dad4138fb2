//! Tests de /health y /metrics.

mod helpers;

use axum::http::StatusCode;
use helpers::{gateway, mount_login};
use serde_json::{Value, json};
use wiremock::MockServer;

#[tokio::test]
async fn health_is_up_while_unauthenticated() {
    let server = MockServer::start().await;
    let gw = gateway(&server);

    let response = gw.client.get("/health").await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "status": "UP",
            "auth": {
                "state": "UNAUTHENTICATED",
                "authenticated": false,
                "retryCount": 0
            }
        })
    );
}

#[tokio::test]
async fn health_reports_authenticated_session() {
    let server = MockServer::start().await;
    mount_login(&server, "tok-1").await;
    let gw = gateway(&server);

    gw.tokens.initialize().await;
    let body: Value = gw.client.get("/health").await.json();

    assert_eq!(body["status"], "UP");
    assert_eq!(body["auth"]["state"], "AUTHENTICATED");
    assert_eq!(body["auth"]["authenticated"], true);
}

#[tokio::test]
async fn health_reports_scheduled_retry() {
    // Sin mock de login: el servidor responde 404 y el login falla
    let server = MockServer::start().await;
    let gw = gateway(&server);

    gw.tokens.initialize().await;
    let body: Value = gw.client.get("/health").await.json();

    assert_eq!(body["status"], "UP");
    assert_eq!(body["auth"]["state"], "RETRY_SCHEDULED");
    assert_eq!(body["auth"]["authenticated"], false);
}

#[tokio::test]
async fn metrics_endpoint_renders_text() {
    let server = MockServer::start().await;
    let gw = gateway(&server);

    let response = gw.client.get("/metrics").await;

    response.assert_status(StatusCode::OK);
    assert!(response.text().is_ascii());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let server = MockServer::start().await;
    let gw = gateway(&server);

    gw.client
        .get("/nonexistent")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

//! Tests de middleware de requests entrantes.

mod helpers;

use helpers::gateway;
use uuid::Uuid;
use wiremock::MockServer;

async fn client() -> (MockServer, helpers::Gateway) {
    let server = MockServer::start().await;
    let gw = gateway(&server);
    (server, gw)
}

#[tokio::test]
async fn response_includes_request_id() {
    let (_server, gw) = client().await;

    gw.client
        .get("/health")
        .await
        .assert_header_exists("x-request-id");
}

#[tokio::test]
async fn generated_request_id_is_uuid_v7() {
    let (_server, gw) = client().await;

    let response = gw.client.get("/health").await;
    let id = response.header("x-request-id").unwrap();
    let parsed = Uuid::parse_str(id).unwrap();

    assert_eq!(parsed.get_version_num(), 7);
}

#[tokio::test]
async fn propagates_incoming_request_id() {
    let (_server, gw) = client().await;
    let custom_id = "my-custom-request-id-12345";

    let response = gw
        .client
        .get_with_headers("/health", vec![("x-request-id", custom_id)])
        .await;

    response.assert_header("x-request-id", custom_id);
}

#[tokio::test]
async fn empty_request_id_is_replaced() {
    let (_server, gw) = client().await;

    let response = gw
        .client
        .get_with_headers("/health", vec![("x-request-id", "")])
        .await;

    let id = response.header("x-request-id").unwrap();
    assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn generates_different_ids_for_each_request() {
    let (_server, gw) = client().await;

    let response1 = gw.client.get("/health").await;
    let response2 = gw.client.get("/health").await;

    assert_ne!(
        response1.header("x-request-id").unwrap(),
        response2.header("x-request-id").unwrap()
    );
}

#[tokio::test]
async fn request_id_present_on_errors() {
    let (_server, gw) = client().await;

    gw.client
        .get("/nonexistent")
        .await
        .assert_header_exists("x-request-id");
}

#[tokio::test]
async fn cors_headers_are_added() {
    let (_server, gw) = client().await;

    let response = gw
        .client
        .get_with_headers("/health", vec![("origin", "http://dashboard.local")])
        .await;

    response.assert_header_exists("access-control-allow-origin");
}

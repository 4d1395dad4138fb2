//! Tests de los endpoints de operacion de caches.

mod helpers;

use axum::http::StatusCode;
use helpers::gateway;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_drivers(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/fleet/repartidores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn cache_metrics_shape() {
    let server = MockServer::start().await;
    mount_drivers(&server, 1).await;
    let gw = gateway(&server);

    gw.client.get("/fleet/drivers").await;
    gw.client.get("/fleet/drivers").await;
    gw.client.get("/fleet/drivers").await;

    let body: Value = gw.client.get("/cache/metrics").await.json();

    assert_eq!(
        body["fleet"],
        json!({ "hits": 2, "misses": 1, "total": 3, "hitRate": 66.67 })
    );
    assert_eq!(
        body["kpi"],
        json!({ "hits": 0, "misses": 0, "total": 0, "hitRate": 0.0 })
    );
    assert!(body["orders"].is_object());
}

#[tokio::test]
async fn reset_metrics_keeps_entries() {
    let server = MockServer::start().await;
    mount_drivers(&server, 1).await;
    let gw = gateway(&server);

    gw.client.get("/fleet/drivers").await;
    gw.client
        .delete("/cache/metrics")
        .await
        .assert_status(StatusCode::OK);

    let body: Value = gw.client.get("/cache/metrics").await.json();
    assert_eq!(body["fleet"]["total"], 0);

    // La entrada sigue en cache: hit sin ir al backend
    gw.client.get("/fleet/drivers").await;
    assert_eq!(gw.state.caches.fleet.metrics().hits, 1);
}

#[tokio::test]
async fn clear_drops_entries_but_keeps_metrics() {
    let server = MockServer::start().await;
    mount_drivers(&server, 2).await;
    let gw = gateway(&server);

    gw.client.get("/fleet/drivers").await;

    let response = gw.client.delete("/cache").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["cleared"], 1);

    gw.client.get("/fleet/drivers").await;
    let metrics = gw.state.caches.fleet.metrics();
    assert_eq!((metrics.hits, metrics.misses), (0, 2));
}

//! HTTP metrics middleware.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, gauge, histogram};
use std::time::Instant;

/// Middleware que registra metricas HTTP para cada request.
///
/// Usa la ruta del router (`/orders/{id}`) y no el path concreto, para no
/// crear una serie por id.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    gauge!("logiflow_http_requests_in_flight").increment(1.0);
    let response = next.run(request).await;
    gauge!("logiflow_http_requests_in_flight").decrement(1.0);

    let status = response.status();

    counter!(
        "logiflow_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    if status.is_server_error() {
        counter!("logiflow_http_errors_total", "route" => route.clone()).increment(1);
    }

    histogram!(
        "logiflow_http_request_duration_seconds",
        "method" => method,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Registra las metricas HTTP
pub fn register_http_metrics() {
    metrics::describe_counter!(
        "logiflow_http_requests_total",
        "Total number of HTTP requests"
    );
    metrics::describe_counter!(
        "logiflow_http_errors_total",
        "HTTP requests answered with a 5xx status"
    );
    metrics::describe_gauge!(
        "logiflow_http_requests_in_flight",
        "HTTP requests currently being served"
    );
    metrics::describe_histogram!(
        "logiflow_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
}

//! Middleware de logging estructurado.

use axum::{
    body::Body,
    http::{Request, Response},
};
use std::{
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::{Instrument, info, info_span, warn};

use super::request_id::RequestId;

#[derive(Clone, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

/// Abre un span `http_request` por request y loguea inicio y fin.
///
/// Debe ir despues de [`RequestIdLayer`](super::RequestIdLayer) en el stack.
#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for LoggingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let start = Instant::now();
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let span = info_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method(),
            path = %request.uri().path(),
        );

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                info!("Request started");

                let response = inner.call(request).await?;
                let status = response.status().as_u16();
                let duration_ms = start.elapsed().as_millis() as u64;

                if response.status().is_server_error() {
                    warn!(status, duration_ms, "Request failed");
                } else {
                    info!(status, duration_ms, "Request completed");
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

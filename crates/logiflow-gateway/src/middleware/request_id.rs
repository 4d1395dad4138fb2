//! Middleware que genera o propaga `x-request-id`.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, Response},
};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header con el id del request.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Id del request entrante, disponible como extension para los handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Asegura que cada request tenga id y lo devuelve en la respuesta.
///
/// Un id entrante se respeta; si no hay (o no es ASCII visible) se genera
/// un UUID v7, ordenable por tiempo en los logs.
#[derive(Clone)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestIdMiddleware<S>
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

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let header = request
            .headers()
            .get(&REQUEST_ID_HEADER)
            .filter(|v| !v.is_empty() && v.to_str().is_ok())
            .cloned()
            .unwrap_or_else(generate_request_id);
        let request_id = header.to_str().unwrap_or("unknown").to_string();

        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), header.clone());
        request.extensions_mut().insert(RequestId(request_id));

        // Servicio que fue poll_ready, el clon queda para el siguiente call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = inner.call(request).await?;
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), header);
            Ok(response)
        })
    }
}

fn generate_request_id() -> HeaderValue {
    HeaderValue::from_str(&Uuid::now_v7().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
}

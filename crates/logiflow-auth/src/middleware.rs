//! Auth-aware request middleware.
//!
//! Wraps any service speaking [`HttpRequest`]/[`HttpResponse`] and
//! attaches the current bearer token. When the backend answers 401 or
//! 403 the layer forces one re-authentication and resubmits the request
//! once. Retry state lives in the request's own [`RequestContext`], so a
//! resubmitted request can never trigger a second cycle.
//!
//! [`RequestContext`]: logiflow_core::RequestContext

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use logiflow_core::{GatewayError, HttpRequest, HttpResponse};
use tower::{Layer, Service, ServiceExt};
use tracing::{debug, warn};

use crate::manager::TokenManager;

/// Layer that adds bearer authentication to a backend service.
#[derive(Clone, Debug)]
pub struct AuthLayer {
    tokens: TokenManager,
}

impl AuthLayer {
    /// Creates a layer reading tokens from `tokens`.
    pub fn new(tokens: TokenManager) -> Self {
        Self { tokens }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            tokens: self.tokens.clone(),
        }
    }
}

/// Service produced by [`AuthLayer`].
#[derive(Clone, Debug)]
pub struct AuthService<S> {
    inner: S,
    tokens: TokenManager,
}

impl<S> Service<HttpRequest> for AuthService<S>
where
    S: Service<HttpRequest, Response = HttpResponse, Error = GatewayError>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = HttpResponse;
    type Error = GatewayError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: HttpRequest) -> Self::Future {
        // Keep the service that was polled ready
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let tokens = self.tokens.clone();

        Box::pin(async move {
            if let Some(header) = tokens.auth_header() {
                request.set_authorization(&header)?;
            }

            let original = request.clone();
            let error = match inner.call(request).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !error.is_auth_failure() || original.context().is_retried() {
                return Err(error);
            }

            let status = error.status().unwrap_or(401);
            warn!(
                status = status,
                method = %original.method(),
                path = %original.path(),
                "Backend rejected credentials, re-authenticating"
            );

            let mut retry = original;
            retry.context_mut().mark_retried();

            if let Err(e) = tokens.force_reauth().await {
                return Err(GatewayError::unauthorized(status, e.to_string()));
            }

            let Some(header) = tokens.auth_header() else {
                return Err(error);
            };
            retry.set_authorization(&header)?;

            debug!(path = %retry.path(), "Resubmitting request with fresh token");
            inner.ready().await?.call(retry).await
        })
    }
}

//! reqwest-backed transport.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use serde_json::Value;
use tower::Service;
use tracing::debug;

use super::{HttpRequest, HttpResponse};
use crate::error::GatewayError;

/// Sends [`HttpRequest`]s to one backend service.
///
/// Non-2xx answers are turned into [`GatewayError::Status`] so that
/// layers above only see successful responses on the `Ok` path.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use logiflow_core::{HttpRequest, ReqwestTransport};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), logiflow_core::GatewayError> {
/// let fleet = ReqwestTransport::new("http://localhost:8000/fleet", Duration::from_secs(5))?;
/// let response = fleet.execute(HttpRequest::get("/repartidores")).await?;
/// println!("{}", response.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Arc<str>,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport with its own connection pool.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::transport(e.to_string()))?;

        Ok(Self::with_client(client, base_url, timeout))
    }

    /// Creates a transport sharing an existing client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            timeout,
        }
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.is_empty() {
            self.base_url.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Sends a request and decodes the answer.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Timeout` when the backend does not answer in time
    /// - `GatewayError::Transport` when the request cannot be delivered
    /// - `GatewayError::Status` for any non-2xx answer
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, GatewayError> {
        let url = self.url_for(request.path());

        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(request.headers().clone());

        if !request.params().is_empty() {
            builder = builder.query(request.params());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;
        let data = decode_body(&bytes);

        debug!(
            method = %request.method(),
            url = %url,
            status = status,
            "Backend responded"
        );

        if (200..300).contains(&status) {
            Ok(HttpResponse::new(status, data))
        } else {
            Err(GatewayError::http(status, data))
        }
    }

    fn map_error(&self, error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else if error.is_builder() {
            GatewayError::InvalidRequest(error.to_string())
        } else {
            GatewayError::transport(error.to_string())
        }
    }
}

/// Decodes a body as JSON, falling back to a string for non-JSON payloads.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

impl Service<HttpRequest> for ReqwestTransport {
    type Response = HttpResponse;
    type Error = GatewayError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // reqwest pools connections internally
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: HttpRequest) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

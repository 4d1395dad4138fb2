//! Clientes de los servicios backend.
//!
//! Cada cliente es un shim sobre un [`HttpService`](logiflow_core::HttpService)
//! ya envuelto por el middleware de autenticacion.

mod fleet;
mod orders;

pub use fleet::{FleetClient, FleetSummary};
pub use orders::OrderClient;

use std::time::Duration;

use logiflow_auth::{AuthLayer, TokenManager};
use logiflow_core::{GatewayError, HttpRequest, HttpService, ReqwestTransport};
use serde_json::Value;
use tower::{ServiceBuilder, ServiceExt};

/// Stack de un backend: middleware de autenticacion sobre un
/// [`ReqwestTransport`] con la URL base y el timeout dados.
pub fn authenticated_service(
    tokens: &TokenManager,
    base_url: &str,
    timeout: Duration,
) -> Result<HttpService, GatewayError> {
    let transport = ReqwestTransport::new(base_url, timeout)?;

    Ok(HttpService::new(
        ServiceBuilder::new()
            .layer(AuthLayer::new(tokens.clone()))
            .service(transport),
    ))
}

/// Envia un GET y retorna el body.
async fn fetch(http: &HttpService, path: String) -> Result<Value, GatewayError> {
    let response = http.clone().oneshot(HttpRequest::get(path)).await?;
    Ok(response.into_data())
}

/// Como [`fetch`], pero un 404 se traduce a `None`.
async fn fetch_optional(http: &HttpService, path: String) -> Result<Option<Value>, GatewayError> {
    match fetch(http, path).await {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

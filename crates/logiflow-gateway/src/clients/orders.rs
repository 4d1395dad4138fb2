//! Cliente del servicio de pedidos.

use logiflow_core::{GatewayError, HttpService};
use serde_json::Value;
use tracing::instrument;

use super::fetch_optional;

#[derive(Clone)]
pub struct OrderClient {
    http: HttpService,
}

impl OrderClient {
    pub fn new(http: HttpService) -> Self {
        Self { http }
    }

    /// GET /pedidos/{id}; `None` si el pedido no existe.
    #[instrument(skip(self))]
    pub async fn order(&self, id: &str) -> Result<Option<Value>, GatewayError> {
        fetch_optional(&self.http, format!("/pedidos/{id}")).await
    }
}

impl std::fmt::Debug for OrderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderClient").finish_non_exhaustive()
    }
}

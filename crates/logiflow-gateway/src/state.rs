//! Application state.

use logiflow_auth::TokenManager;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::cache::GatewayCaches;
use crate::clients::{FleetClient, OrderClient};

/// Estado compartido por todos los handlers.
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenManager,
    pub fleet: FleetClient,
    pub orders: OrderClient,
    pub caches: GatewayCaches,
    pub prometheus: PrometheusHandle,
}

impl AppState {
    pub fn new(
        tokens: TokenManager,
        fleet: FleetClient,
        orders: OrderClient,
        caches: GatewayCaches,
        prometheus: PrometheusHandle,
    ) -> Self {
        Self {
            tokens,
            fleet,
            orders,
            caches,
            prometheus,
        }
    }
}

//! Cache module for the LogiFlow gateway.
//!
//! Tres instancias de [`TtlCache`] separadas por tipo de recurso, cada una
//! con su TTL y sus contadores.

pub mod keys;
pub mod ttl_cache;

use serde::Serialize;
use serde_json::Value;

use crate::metrics::MetricsSnapshot;

// Re-exports
pub use keys::CacheKey;
pub use ttl_cache::{CacheConfig, TtlCache};

/// Caches del proceso: flota, KPIs y pedidos.
#[derive(Debug, Clone)]
pub struct GatewayCaches {
    pub fleet: TtlCache<Value>,
    pub kpi: TtlCache<Value>,
    pub orders: TtlCache<Value>,
}

/// Metricas de las tres instancias, tal como las expone `/cache/metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct CachesMetrics {
    pub fleet: MetricsSnapshot,
    pub kpi: MetricsSnapshot,
    pub orders: MetricsSnapshot,
}

impl GatewayCaches {
    pub fn new(fleet: CacheConfig, kpi: CacheConfig, orders: CacheConfig) -> Self {
        Self {
            fleet: TtlCache::new("fleet", fleet),
            kpi: TtlCache::new("kpi", kpi),
            orders: TtlCache::new("orders", orders),
        }
    }

    pub fn metrics(&self) -> CachesMetrics {
        CachesMetrics {
            fleet: self.fleet.metrics(),
            kpi: self.kpi.metrics(),
            orders: self.orders.metrics(),
        }
    }

    pub fn reset_metrics(&self) {
        self.fleet.reset_metrics();
        self.kpi.reset_metrics();
        self.orders.reset_metrics();
    }

    /// Entradas guardadas en las tres caches.
    pub fn size(&self) -> u64 {
        self.fleet.size() + self.kpi.size() + self.orders.size()
    }

    pub fn clear(&self) {
        self.fleet.clear();
        self.kpi.clear();
        self.orders.clear();
    }
}

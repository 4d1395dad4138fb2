//! Cache metrics recording.

use metrics::{counter, gauge, histogram};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("logiflow_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("logiflow_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "logiflow_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_gauge!("logiflow_cache_entries", "Current number of entries in cache");
    metrics::describe_histogram!(
        "logiflow_cache_operation_seconds",
        "Time spent on cache operations"
    );
}

/// Foto de los contadores de un cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub total: u64,
    /// Porcentaje de hits con 2 decimales (0 sin operaciones)
    pub hit_rate: f64,
}

impl MetricsSnapshot {
    fn new(hits: u64, misses: u64) -> Self {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
        };

        Self {
            hits,
            misses,
            total,
            hit_rate,
        }
    }
}

/// Recorder de metricas de un cache.
/// Los contadores atomicos respaldan el snapshot; las metricas
/// Prometheus llevan el label `cache` con el nombre de la instancia.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    cache: Arc<str>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new(cache: &str) -> Self {
        Self {
            cache: Arc::from(cache),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("logiflow_cache_hits_total", "cache" => self.cache.to_string()).increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("logiflow_cache_misses_total", "cache" => self.cache.to_string()).increment(1);
    }

    /// Registra una eviction
    pub fn record_eviction(&self, reason: &str) {
        counter!(
            "logiflow_cache_evictions_total",
            "cache" => self.cache.to_string(),
            "reason" => reason.to_string()
        )
        .increment(1);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: u64) {
        gauge!("logiflow_cache_entries", "cache" => self.cache.to_string()).set(count as f64);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &str, duration: Duration) {
        histogram!(
            "logiflow_cache_operation_seconds",
            "cache" => self.cache.to_string(),
            "operation" => operation.to_string()
        )
        .record(duration.as_secs_f64());
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::new(self.hits(), self.misses())
    }

    /// Pone los contadores en cero (accion explicita del operador).
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

//! Cache con TTL propio y metricas de hit/miss.

use crate::metrics::{CacheMetrics, MetricsSnapshot};
use moka::notification::RemovalCause;
use moka::sync::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Configuracion de una instancia de cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Tiempo de vida de cada entrada
    pub ttl: Duration,
    /// Maximo numero de entries (None = sin limite)
    pub max_capacity: Option<u64>,
}

impl CacheConfig {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            max_capacity: None,
        }
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }
}

#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Cache en memoria con TTL por instancia.
///
/// La expiracion es perezosa: una entrada vencida se elimina recien cuando
/// se lee. Moka solo aporta el almacenamiento concurrente y, si se
/// configura, el limite de capacidad; la edad se mide con el reloj de
/// tokio para poder testear con tiempo pausado.
///
/// `get_or_compute` no deduplica: dos misses concurrentes sobre la misma
/// key ejecutan el producer dos veces.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use logiflow_gateway::cache::{CacheConfig, TtlCache};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache: TtlCache<String> = TtlCache::new("kpi", CacheConfig::new(Duration::from_secs(60)));
///
/// let value = cache
///     .get_or_compute("flota:resumen", || async { Ok::<_, std::io::Error>("42".to_string()) })
///     .await
///     .unwrap();
/// assert_eq!(value, "42");
/// # }
/// ```
#[derive(Clone)]
pub struct TtlCache<V> {
    name: Arc<str>,
    ttl: Duration,
    inner: Cache<String, CacheEntry<V>>,
    metrics: CacheMetrics,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Crea un cache con la configuracion dada.
    pub fn new(name: &str, config: CacheConfig) -> Self {
        let metrics = CacheMetrics::new(name);

        let mut builder = Cache::builder();
        if let Some(max_capacity) = config.max_capacity {
            builder = builder.max_capacity(max_capacity);
        }

        // Solo las evictions por capacidad llegan aqui; las de TTL se
        // registran en `get`
        let eviction_metrics = metrics.clone();
        builder = builder.eviction_listener(move |_key, _value, cause| {
            if matches!(cause, RemovalCause::Size) {
                eviction_metrics.record_eviction("capacity");
            }
        });

        Self {
            name: Arc::from(name),
            ttl: config.ttl,
            inner: builder.build(),
            metrics,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Obtiene un valor si existe y no vencio.
    /// Una entrada vencida se elimina y cuenta como miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let start = std::time::Instant::now();

        let result = match self.inner.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => Some(entry.value),
            Some(_) => {
                self.inner.invalidate(key);
                self.metrics.record_eviction("ttl");
                None
            },
            None => None,
        };

        if result.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }
        self.metrics
            .record_operation_duration("get", start.elapsed());

        result
    }

    /// Guarda (o reemplaza) un valor con el timestamp actual.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.inner.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
        self.update_entry_gauge();
    }

    /// Retorna el valor cacheado o lo calcula con `producer`.
    ///
    /// En un hit `producer` no se ejecuta. Si `producer` falla no se
    /// guarda nada y el error se propaga.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(cached) = self.get(key) {
            return Ok(cached);
        }

        let start = std::time::Instant::now();
        let value = producer().await?;
        self.metrics
            .record_operation_duration("compute", start.elapsed());

        self.set(key, value.clone());
        Ok(value)
    }

    /// Elimina todas las entradas. No toca los contadores.
    pub fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
        self.update_entry_gauge();
    }

    /// Numero de entradas guardadas (incluye vencidas aun no leidas).
    pub fn size(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// Hits, misses, total y hit rate.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    fn update_entry_gauge(&self) {
        self.metrics.update_entry_count(self.inner.entry_count());
    }
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn cache(ttl_secs: u64) -> TtlCache<String> {
        TtlCache::new("test", CacheConfig::new(Duration::from_secs(ttl_secs)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_and_get_within_ttl() {
        let cache = cache(30);
        cache.set("repartidor:1", "Ana".to_string());

        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(cache.get("repartidor:1").as_deref(), Some("Ana"));
        assert_eq!(cache.metrics().hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_a_miss_and_evicted() {
        let cache = cache(30);
        cache.set("repartidor:1", "Ana".to_string());

        tokio::time::advance(Duration::from_millis(30_001)).await;

        assert!(cache.get("repartidor:1").is_none());
        assert_eq!(cache.size(), 0);
        let snapshot = cache.metrics();
        assert_eq!(snapshot.hits, 0);
        assert_eq!(snapshot.misses, 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_a_miss() {
        let cache = cache(30);
        assert!(cache.get("nope").is_none());
        assert_eq!(cache.metrics().misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_and_refreshes_timestamp() {
        let cache = cache(10);
        cache.set("k", "v1".to_string());
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("k", "v2".to_string());
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("k").as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_get_or_compute_runs_producer_once() {
        let cache = cache(60);
        let calls = Arc::new(AtomicU32::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            let value = cache
                .get_or_compute("flota:resumen", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("resumen".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "resumen");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let snapshot = cache.metrics();
        assert_eq!((snapshot.hits, snapshot.misses), (1, 1));
        assert_eq!(snapshot.hit_rate, 50.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_compute_recomputes_after_ttl() {
        let cache = cache(20);
        let calls = Arc::new(AtomicU32::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            cache
                .get_or_compute("pedido:1", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("pedido".to_string())
                })
                .await
                .unwrap();
            tokio::time::advance(Duration::from_secs(21)).await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_producer_error_is_not_cached() {
        let cache = cache(60);

        let result = cache
            .get_or_compute("k", || async { Err::<String, _>("backend down") })
            .await;
        assert_eq!(result, Err("backend down"));
        assert_eq!(cache.size(), 0);

        let value = cache
            .get_or_compute("k", || async { Ok::<_, &str>("ok".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "ok");
    }

    #[tokio::test]
    async fn test_concurrent_misses_both_compute() {
        let cache = cache(60);
        let calls = Arc::new(AtomicU32::new(0));

        let compute = || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Ok::<_, String>("v".to_string())
            }
        };

        let (a, b) = tokio::join!(
            cache.get_or_compute("k", compute),
            cache.get_or_compute("k", compute)
        );

        assert_eq!(a.unwrap(), "v");
        assert_eq!(b.unwrap(), "v");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_clear_keeps_metrics() {
        let cache = cache(60);
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.get("a");
        assert_eq!(cache.size(), 2);

        cache.clear();

        assert_eq!(cache.size(), 0);
        assert_eq!(cache.metrics().hits, 1);
    }

    #[tokio::test]
    async fn test_reset_metrics() {
        let cache = cache(60);
        cache.get("a");
        cache.set("a", "1".to_string());
        cache.get("a");

        cache.reset_metrics();

        let snapshot = cache.metrics();
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.hit_rate, 0.0);
        // entries survive
        assert_eq!(cache.get("a").as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_max_capacity_bounds_entries() {
        let cache: TtlCache<u32> =
            TtlCache::new("bounded", CacheConfig::new(Duration::from_secs(60)).with_max_capacity(5));

        for i in 0..50 {
            cache.set(format!("k{i}"), i);
        }

        assert!(cache.size() <= 5);
    }
}

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use logiflow_gateway::cache::{CacheConfig, CacheKey, TtlCache};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Runtime;

/// Pedido de prueba con N items
fn create_test_order(num_items: usize) -> Value {
    let items: Vec<Value> = (0..num_items)
        .map(|i| json!({ "sku": format!("sku-{i}"), "cantidad": i % 5 + 1 }))
        .collect();

    json!({
        "id": "p-1",
        "estado": "ASIGNADO",
        "repartidor": { "id": "r-1", "nombre": "Ana" },
        "vehiculo": { "id": "v-1", "placa": "ABC-123" },
        "items": items
    })
}

fn new_cache() -> TtlCache<Value> {
    TtlCache::new("bench", CacheConfig::new(Duration::from_secs(300)))
}

/// Benchmark: get (hit)
fn bench_cache_get_hit(c: &mut Criterion) {
    let cache = new_cache();
    let key = CacheKey::order("p-1").to_string();
    cache.set(key.clone(), create_test_order(100));

    c.bench_function("cache_get_hit", |b| {
        b.iter(|| std::hint::black_box(cache.get(&key)));
    });
}

/// Benchmark: get (miss)
fn bench_cache_get_miss(c: &mut Criterion) {
    let cache = new_cache();
    let key = CacheKey::order("nonexistent").to_string();

    c.bench_function("cache_get_miss", |b| {
        b.iter(|| std::hint::black_box(cache.get(&key)));
    });
}

/// Benchmark: set con diferentes tamanos de valor
fn bench_cache_set_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_set_sizes");

    for size in [10, 100, 500].iter() {
        let cache = new_cache();
        let order = create_test_order(*size);
        let counter = AtomicU64::new(0);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _size| {
            b.iter(|| {
                let count = counter.fetch_add(1, Ordering::Relaxed);
                cache.set(CacheKey::order(&format!("p-{count}")).to_string(), order.clone());
            });
        });
    }

    group.finish();
}

/// Benchmark: get_or_compute sobre una key ya cacheada
fn bench_get_or_compute_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = Arc::new(new_cache());
    let key = CacheKey::FleetSummary.to_string();
    cache.set(key.clone(), json!({ "total": 10 }));

    c.bench_function("cache_get_or_compute_hit", |b| {
        b.to_async(&rt).iter(|| {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            async move {
                let value = cache
                    .get_or_compute(&key, || async { Ok::<_, ()>(json!({ "total": 0 })) })
                    .await;
                std::hint::black_box(value)
            }
        });
    });
}

/// Benchmark: Concurrencia - multiples gets simultaneos
fn bench_cache_concurrent_gets(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = Arc::new(new_cache());

    for i in 0..1000 {
        cache.set(
            CacheKey::driver(&format!("r-{i}")).to_string(),
            json!({ "id": format!("r-{i}") }),
        );
    }

    c.bench_function("cache_concurrent_gets_100", |b| {
        b.to_async(&rt).iter(|| {
            let cache = Arc::clone(&cache);
            async move {
                let handles: Vec<_> = (0..100)
                    .map(|i| {
                        let cache = Arc::clone(&cache);
                        tokio::spawn(async move {
                            cache.get(&CacheKey::driver(&format!("r-{}", i % 1000)).to_string())
                        })
                    })
                    .collect();

                for handle in handles {
                    let _ = handle.await;
                }
            }
        });
    });
}

criterion_group!(
    benches,
    bench_cache_get_hit,
    bench_cache_get_miss,
    bench_cache_set_varying_sizes,
    bench_get_or_compute_hit,
    bench_cache_concurrent_gets,
);

criterion_main!(benches);

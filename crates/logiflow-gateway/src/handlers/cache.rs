//! Endpoints de operacion de las caches.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::cache::CachesMetrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CacheActionResponse {
    /// Entradas eliminadas, cuando aplica.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared: Option<u64>,
    pub message: String,
}

/// GET /cache/metrics
pub async fn cache_metrics(State(state): State<AppState>) -> Json<CachesMetrics> {
    Json(state.caches.metrics())
}

/// DELETE /cache/metrics
/// Pone en cero hits y misses de las tres caches.
#[instrument(skip_all)]
pub async fn reset_cache_metrics(State(state): State<AppState>) -> Json<CacheActionResponse> {
    state.caches.reset_metrics();
    tracing::info!("Cache metrics reset");

    Json(CacheActionResponse {
        cleared: None,
        message: "Cache metrics reset".to_string(),
    })
}

/// DELETE /cache
/// Elimina todas las entradas; los contadores se mantienen.
#[instrument(skip_all)]
pub async fn clear_caches(State(state): State<AppState>) -> Json<CacheActionResponse> {
    let count = state.caches.size();
    state.caches.clear();

    tracing::info!(count = count, "All cache entries cleared");

    Json(CacheActionResponse {
        cleared: Some(count),
        message: format!("Cleared {count} cache entries"),
    })
}

//! Endpoints de pedidos, enriquecidos con repartidor y vehiculo.

use std::collections::{HashMap, HashSet};

use axum::{
    Json,
    extract::{Path, State},
};
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::fleet::required_id;
use crate::cache::CacheKey;
use crate::error::AppError;
use crate::loader::RequestLoaders;
use crate::state::AppState;

/// Body de POST /orders/lookup
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub ids: Vec<String>,
}

/// GET /orders/{id}
#[instrument(skip_all, fields(order_id = %id))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = required_id(&id)?;
    let order = state
        .caches
        .orders
        .get_or_compute(&CacheKey::order(id).to_string(), || async {
            let order = state
                .orders
                .order(id)
                .await?
                .ok_or_else(|| AppError::not_found("order", id))?;

            let loaders = RequestLoaders::new(&state.fleet);
            Ok::<_, AppError>(loaders.enrich_order(order).await?)
        })
        .await?;

    Ok(Json(order))
}

/// POST /orders/lookup
///
/// Retorna los pedidos en el orden pedido, `null` para los inexistentes.
/// Todos comparten un set de loaders: un repartidor o vehiculo comun se
/// pide una sola vez.
#[instrument(skip_all, fields(count = request.ids.len()))]
pub async fn lookup_orders(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<Vec<Value>>, AppError> {
    if request.ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".to_string()));
    }
    let ids = request
        .ids
        .iter()
        .map(|id| required_id(id))
        .collect::<Result<Vec<&str>, _>>()?;

    let mut results: Vec<Option<Value>> = ids
        .iter()
        .map(|id| state.caches.orders.get(&CacheKey::order(id).to_string()))
        .collect();

    // Un id repetido se pide y enriquece una sola vez
    let mut seen = HashSet::new();
    let missing: Vec<&str> = ids
        .iter()
        .zip(&results)
        .filter(|(_, cached)| cached.is_none())
        .map(|(&id, _)| id)
        .filter(|&id| seen.insert(id))
        .collect();
    let raw = try_join_all(missing.iter().map(|&id| state.orders.order(id))).await?;

    // Todos los `load` se registran antes del primer await: un batch por loader
    let loaders = RequestLoaders::new(&state.fleet);
    let (found, pending): (Vec<&str>, Vec<_>) = missing
        .iter()
        .zip(raw)
        .filter_map(|(&id, order)| order.map(|order| (id, loaders.enrich_order(order))))
        .unzip();

    let enriched = try_join_all(pending).await?;
    let enriched: HashMap<&str, Value> = found.into_iter().zip(enriched).collect();
    for (&id, order) in &enriched {
        state
            .caches
            .orders
            .set(CacheKey::order(id).to_string(), order.clone());
    }
    for (id, result) in ids.iter().zip(results.iter_mut()) {
        if result.is_none() {
            *result = enriched.get(id).cloned();
        }
    }

    Ok(Json(
        results
            .into_iter()
            .map(|order| order.unwrap_or(Value::Null))
            .collect(),
    ))
}

//! Endpoints de flota, cacheados en `fleet` y `kpi`.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;
use tracing::instrument;

use crate::cache::CacheKey;
use crate::error::AppError;
use crate::state::AppState;

/// GET /fleet/drivers
#[instrument(skip_all)]
pub async fn list_drivers(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let drivers = state
        .caches
        .fleet
        .get_or_compute(&CacheKey::Drivers.to_string(), || async {
            Ok::<_, AppError>(Value::Array(state.fleet.drivers().await?))
        })
        .await?;

    Ok(Json(drivers))
}

/// GET /fleet/drivers/{id}
#[instrument(skip_all, fields(driver_id = %id))]
pub async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = required_id(&id)?;
    let driver = state
        .caches
        .fleet
        .get_or_compute(&CacheKey::driver(id).to_string(), || async {
            state
                .fleet
                .driver(id)
                .await?
                .ok_or_else(|| AppError::not_found("driver", id))
        })
        .await?;

    Ok(Json(driver))
}

/// GET /fleet/vehicles/{id}
#[instrument(skip_all, fields(vehicle_id = %id))]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = required_id(&id)?;
    let vehicle = state
        .caches
        .fleet
        .get_or_compute(&CacheKey::vehicle(id).to_string(), || async {
            state
                .fleet
                .vehicle(id)
                .await?
                .ok_or_else(|| AppError::not_found("vehicle", id))
        })
        .await?;

    Ok(Json(vehicle))
}

/// GET /fleet/summary
#[instrument(skip_all)]
pub async fn fleet_summary(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let summary = state
        .caches
        .kpi
        .get_or_compute(&CacheKey::FleetSummary.to_string(), || async {
            let summary = state.fleet.summary().await?;
            serde_json::to_value(summary).map_err(|e| AppError::Internal(e.to_string()))
        })
        .await?;

    Ok(Json(summary))
}

pub(crate) fn required_id(id: &str) -> Result<&str, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest("id must not be empty".to_string()));
    }
    Ok(id)
}

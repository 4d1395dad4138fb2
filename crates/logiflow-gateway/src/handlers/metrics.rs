//! Metrics endpoint handler.

use axum::{extract::State, response::IntoResponse};

use crate::state::AppState;

/// Handler para el endpoint /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.prometheus.render()
}

//! Health check con el estado de la sesion de autenticacion.

use axum::{Json, extract::State};
use logiflow_auth::SessionState;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub auth: AuthHealth,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthHealth {
    pub state: SessionState,
    pub authenticated: bool,
    pub retry_count: u32,
}

/// GET /health
///
/// Siempre `UP`: sin token los requests se reenvian igual.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        auth: AuthHealth {
            state: state.tokens.state(),
            authenticated: state.tokens.is_authenticated(),
            retry_count: state.tokens.retry_count(),
        },
    })
}

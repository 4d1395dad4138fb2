//! Errores del API HTTP y su traduccion a respuestas.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use logiflow_core::GatewayError;
use serde::Serialize;

use crate::loader::LoadError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Recurso no encontrado en el backend
    #[error("{0}")]
    NotFound(String),

    /// Parametros invalidos
    #[error("{0}")]
    BadRequest(String),

    /// El backend fallo o no respondio
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// Error interno
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(resource: &str, id: &str) -> Self {
        Self::NotFound(format!("{resource} '{id}' not found"))
    }
}

impl From<GatewayError> for AppError {
    fn from(error: GatewayError) -> Self {
        match &error {
            GatewayError::Timeout { .. } => Self::Upstream {
                status: StatusCode::GATEWAY_TIMEOUT,
                message: error.to_string(),
            },
            GatewayError::Status { status: 404, .. } => {
                Self::NotFound(error.backend_message().unwrap_or("Not found").to_string())
            },
            GatewayError::InvalidRequest(_) => Self::Internal(error.to_string()),
            _ => Self::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: error
                    .backend_message()
                    .map(String::from)
                    .unwrap_or_else(|| error.to_string()),
            },
        }
    }
}

impl From<LoadError> for AppError {
    fn from(error: LoadError) -> Self {
        match error {
            LoadError::Upstream(e) => e.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream { status, message } => (status, message),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            },
        };

        let body = Json(ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
        });

        (status, body).into_response()
    }
}

//! Error types for the authentication session.

use logiflow_core::GatewayError;

/// Errors that can occur while obtaining a token.
///
/// Background retry and refresh paths absorb these; they only reach a
/// caller through [`TokenManager::attempt_login`](crate::TokenManager::attempt_login)
/// and [`TokenManager::force_reauth`](crate::TokenManager::force_reauth).
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// The login request could not be delivered.
    #[error("login exchange failed: {0}")]
    Exchange(String),

    /// The auth service answered with a non-success status.
    #[error("login rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The auth service answered without an `accessToken`.
    #[error("login response did not contain an access token")]
    MissingToken,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The session was shut down while the login was in flight.
    #[error("session was shut down during login")]
    Superseded,
}

impl AuthError {
    /// Creates a new rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Returns true if a later attempt might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Exchange(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<GatewayError> for AuthError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::Status { status, .. } => {
                let message = error
                    .backend_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| "login rejected".to_string());
                Self::Rejected { status, message }
            },
            GatewayError::Decode(_) => Self::MissingToken,
            other => Self::Exchange(other.to_string()),
        }
    }
}

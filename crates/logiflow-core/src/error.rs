//! Error types for outbound calls to backend services.
//!
//! Every downstream call made by the gateway ends in either an
//! [`HttpResponse`](crate::HttpResponse) or a [`GatewayError`]. The
//! variants follow the failure classes the request pipeline treats
//! differently:
//!
//! - transport failures (`Transport`, `Timeout`) are surfaced unchanged
//!   and never retried by the auth layer;
//! - a non-2xx answer (`Status`) is surfaced as-is, except that 401/403
//!   trigger a single forced re-authentication and resubmission;
//! - `Unauthorized` is produced when that forced re-authentication
//!   itself fails.
//!
//! # Example
//!
//! ```
//! use logiflow_core::GatewayError;
//!
//! let error = GatewayError::http(401, serde_json::Value::Null);
//! assert!(error.is_auth_failure());
//! assert_eq!(error.status(), Some(401));
//! ```

use serde_json::Value;
use thiserror::Error;

/// Result alias used across the gateway crates.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while talking to a backend service.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The request could not be delivered (connection refused, DNS, TLS...).
    #[error("transport error: {message}")]
    Transport {
        /// Description of the underlying failure
        message: String,
    },

    /// The backend did not answer within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// The backend answered with a non-success status.
    #[error("backend responded with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Decoded response body (`Null` when empty)
        body: Value,
    },

    /// Forced re-authentication after a 401/403 did not succeed.
    #[error("unauthorized ({status}): {reason}")]
    Unauthorized {
        /// Status of the rejected call that triggered re-authentication
        status: u16,
        /// Why re-authentication failed
        reason: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request itself was malformed (bad URL, invalid header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Creates a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a new status error.
    pub fn http(status: u16, body: Value) -> Self {
        Self::Status { status, body }
    }

    /// Creates a new unauthorized error.
    pub fn unauthorized(status: u16, reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Unauthorized { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for a 401 or 403 answer from the backend.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }

    /// Returns true for a 404 answer from the backend.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns the `message` field of the response body, when the backend sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => body.get("message").and_then(Value::as_str),
            _ => None,
        }
    }
}

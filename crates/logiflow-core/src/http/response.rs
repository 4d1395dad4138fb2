//! Successful backend response.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GatewayError;

/// A 2xx answer from a backend service.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body; `Null` when the backend sent nothing.
    pub data: Value,
}

impl HttpResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// Deserializes the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        serde_json::from_value(self.data.clone()).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Consumes the response, returning the raw body.
    pub fn into_data(self) -> Value {
        self.data
    }
}

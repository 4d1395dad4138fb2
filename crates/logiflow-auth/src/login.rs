//! Login exchange abstraction.

use async_trait::async_trait;
use logiflow_core::{HttpRequest, ReqwestTransport};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::config::Credentials;
use crate::error::AuthError;

/// Successful answer of the auth service.
///
/// Only `accessToken` is required. The metadata fields fall back to empty
/// values when absent or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Opaque bearer token.
    pub access_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Performs one login exchange.
///
/// The token manager only depends on this trait, so tests can inject a
/// scripted implementation instead of a real auth service.
///
/// # Example
///
/// ```ignore
/// use logiflow_auth::{AuthError, Credentials, LoginClient, LoginResponse};
///
/// struct StaticLogin;
///
/// #[async_trait]
/// impl LoginClient for StaticLogin {
///     async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
///         Ok(LoginResponse {
///             access_token: format!("token-for-{}", credentials.username()),
///             username: credentials.username().to_string(),
///             email: String::new(),
///             roles: vec![],
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait LoginClient: Send + Sync {
    /// Exchanges credentials for a token.
    ///
    /// # Errors
    ///
    /// - `AuthError::Exchange` if the auth service cannot be reached
    /// - `AuthError::Rejected` on a non-success status
    /// - `AuthError::MissingToken` if the response lacks `accessToken`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;

    /// Returns the name of this client, used in logs.
    fn name(&self) -> &str {
        "login"
    }
}

/// Login client posting `{username, password}` to `{base}/login`.
#[derive(Debug, Clone)]
pub struct HttpLoginClient {
    transport: ReqwestTransport,
}

impl HttpLoginClient {
    /// Creates a client on top of a transport pointing at the auth service.
    pub fn new(transport: ReqwestTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl LoginClient for HttpLoginClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let request = HttpRequest::post(
            "/login",
            json!({
                "username": credentials.username(),
                "password": credentials.password(),
            }),
        );

        let response = self.transport.execute(request).await?;
        let token_present = response
            .data
            .get("accessToken")
            .and_then(|v| v.as_str())
            .is_some_and(|t| !t.is_empty());
        if !token_present {
            return Err(AuthError::MissingToken);
        }

        response
            .json::<LoginResponse>()
            .map_err(|_| AuthError::MissingToken)
    }

    fn name(&self) -> &str {
        self.transport.base_url()
    }
}

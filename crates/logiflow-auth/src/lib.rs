//! # LogiFlow Auth
//!
//! Keeps the gateway's single bearer token alive and attaches it to
//! outbound backend calls.
//!
//! ## Features
//!
//! - [`TokenManager`]: one owned authentication session with exponential
//!   retry backoff and proactive refresh on tokio timers
//! - [`AuthLayer`]: tower middleware adding `Authorization: Bearer` and
//!   recovering once from 401/403 through a forced re-authentication
//! - [`LoginClient`]: injectable login exchange, with an HTTP implementation
//!
//! ## Example
//!
//! ```ignore
//! use logiflow_auth::{AuthConfig, AuthLayer, TokenManager};
//! use logiflow_core::{HttpRequest, ReqwestTransport};
//! use tower::{ServiceBuilder, ServiceExt};
//!
//! let config = AuthConfig::builder()
//!     .login_url("http://localhost:8000/auth")
//!     .credentials("gateway", "secret")
//!     .build()?;
//! let tokens = TokenManager::http(config, Duration::from_secs(5))?;
//!
//! let fleet = ServiceBuilder::new()
//!     .layer(AuthLayer::new(tokens.clone()))
//!     .service(ReqwestTransport::new("http://localhost:8000/fleet", Duration::from_secs(5))?);
//!
//! let drivers = fleet.oneshot(HttpRequest::get("/repartidores")).await?;
//! ```

pub mod config;
pub mod error;
pub mod login;
pub mod manager;
pub mod middleware;
pub mod session;

// Re-exports
pub use config::{AuthConfig, AuthConfigBuilder, Credentials};
pub use error::AuthError;
pub use login::{HttpLoginClient, LoginClient, LoginResponse};
pub use manager::TokenManager;
pub use middleware::{AuthLayer, AuthService};
pub use session::{ArmedTimer, SessionState, TimerKind};

// Re-export logiflow_core for consumers
pub use logiflow_core;

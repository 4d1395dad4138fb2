//! LogiFlow Gateway - acceso cacheado, agrupado y autenticado a los
//! servicios de flota y pedidos.
//!
//! - [`cache`]: caches con TTL y metricas de hit/miss
//! - [`loader`]: batch loaders por request
//! - [`clients`]: clientes de los backends sobre el middleware de auth
//! - [`server`]: router axum y ciclo de vida del servidor

pub mod cache;
pub mod clients;
pub mod error;
pub mod handlers;
pub mod loader;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use server::{create_router, run_server};
pub use settings::{Settings, SettingsError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! LogiFlow gateway binary.

use anyhow::Context;
use logiflow_auth::TokenManager;
use logiflow_gateway::{
    AppState, Settings,
    cache::GatewayCaches,
    clients::{FleetClient, OrderClient, authenticated_service},
    create_router,
    metrics::init_metrics,
    run_server,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load(None).context("Failed to load settings")?;
    let addr = settings.addr()?;
    let timeout = settings.http_timeout();

    tracing::info!(
        "Starting LogiFlow gateway v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Auth service: {}", settings.auth.url);
    tracing::info!("Fleet service: {}", settings.services.fleet_url);
    tracing::info!("Order service: {}", settings.services.order_url);

    let prometheus = init_metrics().context("Failed to install metrics recorder")?;

    let tokens = TokenManager::http(settings.auth_config()?, timeout)?;
    let fleet = FleetClient::new(authenticated_service(
        &tokens,
        &settings.services.fleet_url,
        timeout,
    )?);
    let orders = OrderClient::new(authenticated_service(
        &tokens,
        &settings.services.order_url,
        timeout,
    )?);
    let caches = GatewayCaches::new(
        settings.cache.fleet(),
        settings.cache.kpi(),
        settings.cache.orders(),
    );

    // El login inicial no bloquea el arranque: sin token se reenvia igual
    let session = tokens.clone();
    tokio::spawn(async move { session.initialize().await });

    let state = AppState::new(tokens.clone(), fleet, orders, caches, prometheus);
    let served = run_server(addr, create_router(state)).await;

    tokens.shutdown();
    tracing::info!("Token manager stopped");

    served.context("Server error")
}

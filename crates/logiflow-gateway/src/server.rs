use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::handlers::{
    cache::{cache_metrics, clear_caches, reset_cache_metrics},
    fleet::{fleet_summary, get_driver, get_vehicle, list_drivers},
    health::health_check,
    metrics::metrics_handler,
    orders::{get_order, lookup_orders},
};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Crea el router con todas las rutas y el stack de middleware.
pub fn create_router(state: AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer)
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        // Operacion de caches
        .route("/cache", delete(clear_caches))
        .route(
            "/cache/metrics",
            get(cache_metrics).delete(reset_cache_metrics),
        )
        // Flota
        .route("/fleet/drivers", get(list_drivers))
        .route("/fleet/drivers/{id}", get(get_driver))
        .route("/fleet/vehicles/{id}", get(get_vehicle))
        .route("/fleet/summary", get(fleet_summary))
        // Pedidos
        .route("/orders/lookup", post(lookup_orders))
        .route("/orders/{id}", get(get_order))
        .with_state(state)
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(middleware_stack)
}

/// Sirve `router` hasta recibir SIGINT o SIGTERM.
pub async fn run_server(addr: SocketAddr, router: Router) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

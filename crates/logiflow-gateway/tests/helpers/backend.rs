//! Gateway completo contra backends de wiremock.
//!
//! Un solo `MockServer` atiende los tres servicios bajo `/auth`, `/fleet`
//! y `/pedido`.

use std::time::Duration;

use logiflow_auth::{AuthConfig, TokenManager};
use logiflow_gateway::{
    AppState,
    cache::{CacheConfig, GatewayCaches},
    clients::{FleetClient, OrderClient, authenticated_service},
    create_router,
    metrics::detached_handle,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::client::TestClient;

pub struct Gateway {
    pub client: TestClient,
    pub tokens: TokenManager,
    pub state: AppState,
}

/// Arma el gateway apuntando a `server`. No hace login.
pub fn gateway(server: &MockServer) -> Gateway {
    let timeout = Duration::from_secs(2);
    let config = AuthConfig::builder()
        .login_url(format!("{}/auth", server.uri()))
        .credentials("admin", "secret")
        .build()
        .unwrap();
    let tokens = TokenManager::http(config, timeout).unwrap();

    let fleet = FleetClient::new(
        authenticated_service(&tokens, &format!("{}/fleet", server.uri()), timeout).unwrap(),
    );
    let orders = OrderClient::new(
        authenticated_service(&tokens, &format!("{}/pedido", server.uri()), timeout).unwrap(),
    );
    let caches = GatewayCaches::new(
        CacheConfig::new(Duration::from_secs(30)),
        CacheConfig::new(Duration::from_secs(60)),
        CacheConfig::new(Duration::from_secs(20)),
    );

    let state = AppState::new(tokens.clone(), fleet, orders, caches, detached_handle());

    Gateway {
        client: TestClient::new(create_router(state.clone())),
        tokens,
        state,
    }
}

/// Login que siempre entrega `token`.
pub async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": token,
            "username": "admin",
            "email": "admin@logiflow.test",
            "roles": ["ADMIN"]
        })))
        .mount(server)
        .await;
}

//! Shared helpers for the auth integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use logiflow_auth::{AuthConfig, AuthError, Credentials, LoginClient, LoginResponse, TokenManager};
use parking_lot::Mutex;

/// Login client answering from a script; once the script is exhausted
/// every call returns `fallback`.
pub struct ScriptedLogin {
    script: Mutex<VecDeque<Result<String, AuthError>>>,
    fallback: Result<String, AuthError>,
    calls: AtomicU32,
    delay: Duration,
}

impl ScriptedLogin {
    pub fn new(script: Vec<Result<&str, AuthError>>) -> Arc<Self> {
        Self::build(script, Ok("fallback-token".to_string()), Duration::ZERO)
    }

    pub fn always_failing() -> Arc<Self> {
        Self::build(vec![], Err(rejected()), Duration::ZERO)
    }

    pub fn slow(token: &str, delay: Duration) -> Arc<Self> {
        Self::build(vec![], Ok(token.to_string()), delay)
    }

    fn build(
        script: Vec<Result<&str, AuthError>>,
        fallback: Result<String, AuthError>,
        delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string))
                    .collect(),
            ),
            fallback,
            calls: AtomicU32::new(0),
            delay,
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoginClient for ScriptedLogin {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let next = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        next.map(|token| LoginResponse {
            access_token: token,
            username: credentials.username().to_string(),
            email: "gateway@logiflow.io".to_string(),
            roles: vec!["ADMIN".to_string()],
        })
    }
}

pub fn rejected() -> AuthError {
    AuthError::rejected(401, "Credenciales invalidas")
}

pub fn config() -> AuthConfig {
    AuthConfig::builder()
        .login_url("http://auth.test")
        .credentials("gateway", "secret")
        .build()
        .unwrap()
}

pub fn manager(client: Arc<ScriptedLogin>) -> TokenManager {
    TokenManager::new(config(), client)
}

/// Lets spawned timer tasks run after the clock moved.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// Advances the paused clock and lets timer tasks run.
pub async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}

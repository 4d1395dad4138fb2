//! Token lifecycle manager.

use std::sync::Arc;
use std::time::Duration;

use logiflow_core::ReqwestTransport;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::login::{HttpLoginClient, LoginClient};
use crate::session::{ArmedTimer, Session, SessionState, TimerKind};

/// Owns the single authentication session of the process.
///
/// The manager keeps a bearer token alive in the background: a failed
/// login is retried with exponential backoff, a successful one arms a
/// refresh before the token expires. Callers only ever read the current
/// token; none of them wait for a login unless they call
/// [`force_reauth`](Self::force_reauth).
///
/// Cloning is cheap and every clone drives the same session. Build one at
/// startup and hand clones to whoever needs auth state.
///
/// # Example
///
/// ```ignore
/// use logiflow_auth::{AuthConfig, TokenManager};
///
/// let config = AuthConfig::builder()
///     .login_url("http://localhost:8000/auth")
///     .credentials("gateway", "secret")
///     .build()?;
///
/// let tokens = TokenManager::http(config, Duration::from_secs(5))?;
/// tokio::spawn({
///     let tokens = tokens.clone();
///     async move { tokens.initialize().await }
/// });
///
/// if let Some(header) = tokens.auth_header() {
///     // attach to the outbound request
/// }
/// ```
#[derive(Clone)]
pub struct TokenManager {
    inner: Arc<Inner>,
}

struct Inner {
    config: AuthConfig,
    client: Arc<dyn LoginClient>,
    session: Mutex<Session>,
    state_tx: watch::Sender<SessionState>,
}

impl TokenManager {
    /// Creates a manager that logs in through `client`.
    pub fn new(config: AuthConfig, client: Arc<dyn LoginClient>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Unauthenticated);

        Self {
            inner: Arc::new(Inner {
                config,
                client,
                session: Mutex::new(Session::new()),
                state_tx,
            }),
        }
    }

    /// Creates a manager that logs in against `config.login_url()` over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidConfig` if the HTTP client cannot be built.
    pub fn http(config: AuthConfig, timeout: Duration) -> Result<Self, AuthError> {
        let transport = ReqwestTransport::new(config.login_url(), timeout)
            .map_err(|e| AuthError::InvalidConfig(e.to_string()))?;
        let client = Arc::new(HttpLoginClient::new(transport));

        Ok(Self::new(config, client))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.inner.config
    }

    /// Starts the session with one immediate login.
    ///
    /// Success arms the refresh timer, failure arms a retry timer. Does
    /// nothing unless the session is unauthenticated, so repeated calls
    /// are harmless. After the retry budget is exhausted this is the way
    /// to start over with a fresh budget.
    pub async fn initialize(&self) {
        let epoch = {
            let mut session = self.inner.session.lock();
            if session.state != SessionState::Unauthenticated {
                debug!(state = %session.state, "Session already started, skipping initialize");
                return;
            }
            session.retry_count = 0;
            self.inner.begin_login(&mut session)
        };

        info!(client = self.inner.client.name(), "Initializing authentication session");

        if self.inner.finish_login(epoch, OnFailure::Retry).await.is_ok() {
            self.inner.schedule_token_refresh();
        }
    }

    /// Performs one login exchange.
    ///
    /// On success the token is stored and the retry count reset. On
    /// failure the stored token and retry count are left untouched and
    /// nothing is scheduled.
    pub async fn attempt_login(&self) -> Result<(), AuthError> {
        self.inner.attempt_login(OnFailure::Report).await
    }

    /// Arms a retry timer with exponential backoff.
    ///
    /// No-op while authenticated. Once `max_retries` is reached nothing is
    /// armed and the session stays unauthenticated.
    pub fn schedule_retry(&self) {
        self.inner.schedule_retry();
    }

    /// Arms the refresh timer.
    pub fn schedule_token_refresh(&self) {
        self.inner.schedule_token_refresh();
    }

    /// Logs in immediately, outside the timer schedule.
    ///
    /// Concurrent calls are not coalesced; each one performs its own
    /// login. On failure a retry is scheduled and the error returned.
    pub async fn force_reauth(&self) -> Result<(), AuthError> {
        info!("Forcing re-authentication");

        let result = self.inner.attempt_login(OnFailure::Retry).await;
        match &result {
            Ok(()) => self.inner.schedule_token_refresh(),
            Err(AuthError::Superseded) => {},
            Err(e) => warn!(error = %e, "Forced re-authentication failed, retries scheduled"),
        }
        result
    }

    /// Cancels timers, clears the token and resets the session.
    ///
    /// A login already in flight is not aborted, but its result is
    /// discarded when it completes.
    pub fn shutdown(&self) {
        let mut session = self.inner.session.lock();
        session.reset();
        self.inner.publish(&session);
        info!("Authentication session closed");
    }

    /// Returns the current token.
    pub fn token(&self) -> Option<String> {
        self.inner.session.lock().token.clone()
    }

    /// Returns the `Authorization` header value for the current token.
    pub fn auth_header(&self) -> Option<String> {
        match self.token() {
            Some(token) => Some(format!("Bearer {token}")),
            None => {
                warn!("Token requested but none is available");
                None
            },
        }
    }

    /// Returns true if a token is held, including while it is being
    /// refreshed.
    pub fn is_authenticated(&self) -> bool {
        let session = self.inner.session.lock();
        session.token.is_some() && session.state != SessionState::Unauthenticated
    }

    /// Returns the current session state.
    pub fn state(&self) -> SessionState {
        self.inner.session.lock().state
    }

    /// Returns the number of retries since the last successful login.
    pub fn retry_count(&self) -> u32 {
        self.inner.session.lock().retry_count
    }

    /// Returns the armed timer, if any.
    pub fn armed_timer(&self) -> Option<ArmedTimer> {
        self.inner.session.lock().timer.armed()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.inner.session.lock();
        f.debug_struct("TokenManager")
            .field("state", &session.state)
            .field("retry_count", &session.retry_count)
            .field("has_token", &session.token.is_some())
            .finish()
    }
}

/// What a failed login does before the session lock is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnFailure {
    /// Only record the failure.
    Report,
    /// Record the failure and arm the next retry in the same critical section.
    Retry,
}

impl Inner {
    fn publish(&self, session: &Session) {
        let state = session.state;
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            debug!(from = %current, to = %state, "Session state changed");
            *current = state;
            true
        });
    }

    /// Marks the session as authenticating and returns the epoch the
    /// login belongs to.
    fn begin_login(&self, session: &mut Session) -> u64 {
        session.state = SessionState::Authenticating;
        self.publish(session);
        session.epoch
    }

    async fn attempt_login(self: &Arc<Self>, on_failure: OnFailure) -> Result<(), AuthError> {
        let epoch = {
            let mut session = self.session.lock();
            self.begin_login(&mut session)
        };
        self.finish_login(epoch, on_failure).await
    }

    async fn finish_login(
        self: &Arc<Self>,
        epoch: u64,
        on_failure: OnFailure,
    ) -> Result<(), AuthError> {
        let result = self.client.login(self.config.credentials()).await;

        let mut session = self.session.lock();
        if session.epoch != epoch {
            debug!("Session was shut down during login, discarding result");
            return Err(AuthError::Superseded);
        }

        match result {
            Ok(response) => {
                info!(
                    username = %response.username,
                    email = %response.email,
                    roles = ?response.roles,
                    token = %token_preview(&response.access_token),
                    "Login successful"
                );
                session.record_success(response.access_token);
                self.publish(&session);
                Ok(())
            },
            Err(e) => {
                warn!(error = %e, retry_count = session.retry_count, "Login failed");
                session.record_failure();
                match on_failure {
                    OnFailure::Report => self.publish(&session),
                    OnFailure::Retry => self.retry_locked(&mut session),
                }
                Err(e)
            },
        }
    }

    fn schedule_retry(self: &Arc<Self>) {
        let mut session = self.session.lock();
        self.retry_locked(&mut session);
    }

    /// Arms the next retry, or gives up once the budget is spent, then
    /// publishes the resulting state.
    fn retry_locked(self: &Arc<Self>, session: &mut Session) {
        if session.state == SessionState::Authenticated {
            debug!("Already authenticated, no retry needed");
            self.publish(session);
            return;
        }

        if session.retry_count >= self.config.max_retries() {
            error!(
                retry_count = session.retry_count,
                "Maximum login retries reached, automatic recovery stopped"
            );
            session.timer.disarm();
            session.state = SessionState::Unauthenticated;
            self.publish(session);
            return;
        }

        let delay = self.config.retry_delay(session.retry_count);
        self.arm(session, TimerKind::Retry, delay);
        session.state = SessionState::RetryScheduled;
        self.publish(session);

        info!(
            retry_count = session.retry_count,
            delay_ms = delay.as_millis() as u64,
            "Login retry scheduled"
        );
    }

    fn schedule_token_refresh(self: &Arc<Self>) {
        let delay = self.config.refresh_interval();
        let mut session = self.session.lock();
        self.arm(&mut session, TimerKind::Refresh, delay);

        info!(delay_ms = delay.as_millis() as u64, "Token refresh scheduled");
    }

    fn arm(self: &Arc<Self>, session: &mut Session, kind: TimerKind, delay: Duration) {
        let weak = Arc::downgrade(self);
        session.timer.arm(kind, delay, move |id, deadline| async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = weak.upgrade() {
                inner.on_timer(id, kind).await;
            }
        });
    }

    async fn on_timer(self: Arc<Self>, id: u64, kind: TimerKind) {
        {
            let mut session = self.session.lock();
            if !session.timer.release(id) {
                return;
            }
            if kind == TimerKind::Retry {
                session.retry_count += 1;
            }
        }

        match kind {
            TimerKind::Retry => {
                if self.attempt_login(OnFailure::Retry).await.is_ok() {
                    self.schedule_token_refresh();
                }
            },
            TimerKind::Refresh => {
                info!("Refreshing token");
                match self.attempt_login(OnFailure::Report).await {
                    Ok(()) => self.schedule_token_refresh(),
                    Err(AuthError::Superseded) => {},
                    Err(e) => {
                        let delay = self.config.refresh_retry_delay();
                        error!(
                            error = %e,
                            delay_ms = delay.as_millis() as u64,
                            "Token refresh failed"
                        );
                        let mut session = self.session.lock();
                        self.arm(&mut session, TimerKind::RefreshRetry, delay);
                    },
                }
            },
            TimerKind::RefreshRetry => self.schedule_token_refresh(),
        }
    }
}

/// Returns at most the first 8 characters of a token, for logs.
fn token_preview(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}

//! Authentication session state.

use std::fmt;

use serde::Serialize;

use super::TimerSlot;

/// Lifecycle state of the authentication session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// No token and no login in progress.
    Unauthenticated,
    /// A login exchange is in flight.
    Authenticating,
    /// A token is held.
    Authenticated,
    /// The last login failed and a retry timer is armed.
    RetryScheduled,
}

impl SessionState {
    /// Returns the state name as used in health reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Authenticating => "AUTHENTICATING",
            Self::Authenticated => "AUTHENTICATED",
            Self::RetryScheduled => "RETRY_SCHEDULED",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutable session record guarded by the manager's lock.
#[derive(Debug)]
pub(crate) struct Session {
    /// The current bearer token.
    pub token: Option<String>,
    /// The current lifecycle state.
    pub state: SessionState,
    /// Retries performed since the last successful login.
    pub retry_count: u32,
    /// Bumped on shutdown so in-flight logins can detect they are stale.
    pub epoch: u64,
    /// The single armed retry or refresh timer.
    pub timer: TimerSlot,
}

impl Session {
    /// Creates an unauthenticated session.
    pub fn new() -> Self {
        Self {
            token: None,
            state: SessionState::Unauthenticated,
            retry_count: 0,
            epoch: 0,
            timer: TimerSlot::new(),
        }
    }

    /// Records a successful login.
    pub fn record_success(&mut self, token: String) {
        self.token = Some(token);
        self.state = SessionState::Authenticated;
        self.retry_count = 0;
    }

    /// Records a failed login. The stored token and retry count are kept.
    pub fn record_failure(&mut self) {
        self.state = if self.token.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
    }

    /// Cancels timers and forgets the token.
    pub fn reset(&mut self) {
        self.timer.disarm();
        self.token = None;
        self.state = SessionState::Unauthenticated;
        self.retry_count = 0;
        self.epoch = self.epoch.wrapping_add(1);
    }
}

//! Authentication session configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Static username/password pair used for every login.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Configuration for the token lifecycle manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Base URL of the auth service (`/login` is appended).
    login_url: String,

    /// Credentials sent on every login.
    credentials: Credentials,

    /// Delay before the first retry after a failed login.
    #[serde(default = "default_initial_retry_delay", with = "duration_secs")]
    initial_retry_delay: Duration,

    /// Upper bound for the exponential retry delay.
    #[serde(default = "default_max_retry_delay", with = "duration_secs")]
    max_retry_delay: Duration,

    /// Retries allowed before automatic recovery stops.
    #[serde(default = "default_max_retries")]
    max_retries: u32,

    /// Interval between proactive token refreshes.
    #[serde(default = "default_refresh_interval", with = "duration_secs")]
    refresh_interval: Duration,

    /// Delay before trying again when a refresh fails.
    #[serde(default = "default_refresh_retry_delay", with = "duration_secs")]
    refresh_retry_delay: Duration,
}

fn default_initial_retry_delay() -> Duration {
    Duration::from_secs(3)
}

fn default_max_retry_delay() -> Duration {
    Duration::from_secs(120)
}

fn default_max_retries() -> u32 {
    30
}

// tokens are valid for 60 minutes
fn default_refresh_interval() -> Duration {
    Duration::from_secs(50 * 60)
}

fn default_refresh_retry_delay() -> Duration {
    Duration::from_secs(5 * 60)
}

impl AuthConfig {
    /// Creates a new builder for AuthConfig.
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Returns the auth service base URL.
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Returns the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn initial_retry_delay(&self) -> Duration {
        self.initial_retry_delay
    }

    pub fn max_retry_delay(&self) -> Duration {
        self.max_retry_delay
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    pub fn refresh_retry_delay(&self) -> Duration {
        self.refresh_retry_delay
    }

    /// Returns the delay before retry number `retry_count`.
    ///
    /// Doubles from `initial_retry_delay` and saturates at `max_retry_delay`.
    pub fn retry_delay(&self, retry_count: u32) -> Duration {
        1u32.checked_shl(retry_count)
            .and_then(|factor| self.initial_retry_delay.checked_mul(factor))
            .map_or(self.max_retry_delay, |delay| delay.min(self.max_retry_delay))
    }
}

/// Builder for AuthConfig.
#[derive(Debug, Default)]
pub struct AuthConfigBuilder {
    login_url: Option<String>,
    credentials: Option<Credentials>,
    initial_retry_delay: Option<Duration>,
    max_retry_delay: Option<Duration>,
    max_retries: Option<u32>,
    refresh_interval: Option<Duration>,
    refresh_retry_delay: Option<Duration>,
}

impl AuthConfigBuilder {
    /// Sets the auth service base URL.
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = Some(url.into());
        self
    }

    /// Sets the login credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    pub fn initial_retry_delay(mut self, delay: Duration) -> Self {
        self.initial_retry_delay = Some(delay);
        self
    }

    pub fn max_retry_delay(mut self, delay: Duration) -> Self {
        self.max_retry_delay = Some(delay);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    pub fn refresh_retry_delay(mut self, delay: Duration) -> Self {
        self.refresh_retry_delay = Some(delay);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidConfig` if required fields are missing
    /// or a delay is zero.
    pub fn build(self) -> Result<AuthConfig, AuthError> {
        let login_url = self
            .login_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AuthError::InvalidConfig("login_url is required".into()))?;
        let credentials = self
            .credentials
            .ok_or_else(|| AuthError::InvalidConfig("credentials are required".into()))?;

        let config = AuthConfig {
            login_url,
            credentials,
            initial_retry_delay: self
                .initial_retry_delay
                .unwrap_or_else(default_initial_retry_delay),
            max_retry_delay: self.max_retry_delay.unwrap_or_else(default_max_retry_delay),
            max_retries: self.max_retries.unwrap_or_else(default_max_retries),
            refresh_interval: self.refresh_interval.unwrap_or_else(default_refresh_interval),
            refresh_retry_delay: self
                .refresh_retry_delay
                .unwrap_or_else(default_refresh_retry_delay),
        };

        if config.initial_retry_delay.is_zero() || config.refresh_interval.is_zero() {
            return Err(AuthError::InvalidConfig(
                "retry and refresh delays must be non-zero".into(),
            ));
        }
        if config.max_retry_delay < config.initial_retry_delay {
            return Err(AuthError::InvalidConfig(
                "max_retry_delay must not be smaller than initial_retry_delay".into(),
            ));
        }

        Ok(config)
    }
}

mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

//! Configuracion del gateway.
//!
//! Se carga en capas con el crate `config`:
//! 1. Defaults de cada seccion
//! 2. `logiflow.toml` opcional (ruta sobreescribible con `LOGIFLOW_CONFIG`)
//! 3. Variables de entorno `LOGIFLOW__SECCION__CAMPO`, p.ej. `LOGIFLOW__AUTH__USERNAME`

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use logiflow_auth::AuthConfig;
use serde::Deserialize;

use crate::cache::CacheConfig;

/// Archivo de configuracion por defecto.
pub const DEFAULT_CONFIG_FILE: &str = "logiflow.toml";

/// Variable con la ruta del archivo de configuracion.
pub const CONFIG_PATH_ENV: &str = "LOGIFLOW_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub services: ServiceSettings,
    pub http: HttpSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

/// Login contra el servicio de autenticacion.
///
/// Usuario y password no tienen default.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub url: String,
    pub username: String,
    pub password: String,
    pub initial_retry_secs: u64,
    pub max_retry_secs: u64,
    pub max_retries: u32,
    pub refresh_interval_secs: u64,
    pub refresh_retry_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/auth".to_string(),
            username: String::new(),
            password: String::new(),
            initial_retry_secs: 3,
            max_retry_secs: 120,
            max_retries: 30,
            refresh_interval_secs: 50 * 60,
            refresh_retry_secs: 5 * 60,
        }
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub fleet_url: String,
    pub order_url: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            fleet_url: "http://localhost:8000/fleet".to_string(),
            order_url: "http://localhost:8000/pedido".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub fleet_ttl_secs: u64,
    pub kpi_ttl_secs: u64,
    pub order_ttl_secs: u64,
    /// Sin valor, las caches no tienen limite de entries.
    pub max_capacity: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            fleet_ttl_secs: 30,
            kpi_ttl_secs: 60,
            order_ttl_secs: 20,
            max_capacity: None,
        }
    }
}

impl CacheSettings {
    fn cache_config(&self, ttl_secs: u64) -> CacheConfig {
        let config = CacheConfig::new(Duration::from_secs(ttl_secs));
        match self.max_capacity {
            Some(max) => config.with_max_capacity(max),
            None => config,
        }
    }

    pub fn fleet(&self) -> CacheConfig {
        self.cache_config(self.fleet_ttl_secs)
    }

    pub fn kpi(&self) -> CacheConfig {
        self.cache_config(self.kpi_ttl_secs)
    }

    pub fn orders(&self) -> CacheConfig {
        self.cache_config(self.order_ttl_secs)
    }
}

impl Settings {
    /// Carga defaults, archivo y entorno.
    ///
    /// Sin `path`, usa `LOGIFLOW_CONFIG` o `logiflow.toml`; el archivo es
    /// opcional.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = path.map(Path::to_path_buf).unwrap_or_else(|| {
            std::env::var(CONFIG_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
        });

        let mut builder = Config::builder();
        if file.exists() {
            builder = builder.add_source(File::from(file));
        }
        builder = builder.add_source(
            Environment::with_prefix("LOGIFLOW")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.http.timeout_ms == 0 {
            return Err(SettingsError::Invalid("http.timeout_ms must be > 0".into()));
        }
        for (name, ttl) in [
            ("cache.fleet_ttl_secs", self.cache.fleet_ttl_secs),
            ("cache.kpi_ttl_secs", self.cache.kpi_ttl_secs),
            ("cache.order_ttl_secs", self.cache.order_ttl_secs),
        ] {
            if ttl == 0 {
                return Err(SettingsError::Invalid(format!("{name} must be > 0")));
            }
        }
        self.auth_config().map(|_| ())
    }

    pub fn addr(&self) -> Result<SocketAddr, SettingsError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| SettingsError::Invalid(format!("server address: {e}")))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http.timeout_ms)
    }

    /// Construye la configuracion del `TokenManager`.
    pub fn auth_config(&self) -> Result<AuthConfig, SettingsError> {
        let auth = &self.auth;
        if auth.username.trim().is_empty() || auth.password.is_empty() {
            return Err(SettingsError::Invalid(
                "auth.username and auth.password are required".into(),
            ));
        }

        AuthConfig::builder()
            .login_url(&auth.url)
            .credentials(&auth.username, &auth.password)
            .initial_retry_delay(Duration::from_secs(auth.initial_retry_secs))
            .max_retry_delay(Duration::from_secs(auth.max_retry_secs))
            .max_retries(auth.max_retries)
            .refresh_interval(Duration::from_secs(auth.refresh_interval_secs))
            .refresh_retry_delay(Duration::from_secs(auth.refresh_retry_secs))
            .build()
            .map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}

//! Web application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults start a self-contained server
//! backed by in-memory stores.
//!
//! - `BIKESHOP_DATABASE_URL` - `PostgreSQL` connection string (fallback: `DATABASE_URL`)
//! - `BIKESHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `BIKESHOP_PORT` - Listen port (default: 3002)
//! - `BIKESHOP_BASE_URL` - Public URL (default: <http://localhost:3002>)
//! - `BIKESHOP_SESSION_STORE` - `memory` or `database` (default: `database` when a
//!   database URL is set, `memory` otherwise)
//! - `BIKESHOP_STATIC_DIR` - Static asset directory (default: crates/web/static)
//! - `BIKESHOP_LOG_JSON` - Emit JSON log lines when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3002;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where session state is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// In-process store; sessions are lost on restart.
    Memory,
    /// `PostgreSQL` table shared with the record stores.
    Database,
}

impl FromStr for SessionBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "database" | "postgres" => Ok(Self::Database),
            other => Err(format!("expected `memory` or `database`, got `{other}`")),
        }
    }
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// `PostgreSQL` connection URL (contains password). `None` selects the
    /// in-memory stores.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Session store selection
    pub session_backend: SessionBackend,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Emit JSON formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value, or
    /// if the database session store is requested without a database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BIKESHOP_DATABASE_URL");
        let host = parse_env("BIKESHOP_HOST", "127.0.0.1")?;
        let port = parse_env("BIKESHOP_PORT", &DEFAULT_PORT.to_string())?;
        let base_url = get_env_or_default("BIKESHOP_BASE_URL", "http://localhost:3002");
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BIKESHOP_BASE_URL".to_string(), e.to_string())
        })?;

        let default_backend = if database_url.is_some() {
            "database"
        } else {
            "memory"
        };
        let session_backend: SessionBackend =
            parse_env("BIKESHOP_SESSION_STORE", default_backend)?;
        if session_backend == SessionBackend::Database && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "BIKESHOP_DATABASE_URL (required by BIKESHOP_SESSION_STORE=database)".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_backend,
            static_dir: PathBuf::from(get_env_or_default(
                "BIKESHOP_STATIC_DIR",
                "crates/web/static",
            )),
            log_json: get_optional_env("BIKESHOP_LOG_JSON").is_some(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for in-process use (tests, local demos): in-memory
    /// stores and sessions, plain HTTP.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database_url: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            base_url: "http://localhost:3002".to_string(),
            session_backend: SessionBackend::Memory,
            static_dir: PathBuf::from("crates/web/static"),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the session cookie should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

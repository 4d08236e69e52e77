//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `CAFE_DATABASE_URL` - SQLite connection string (fallback: `DATABASE_URL`,
//!   default: `sqlite://cafes.db`)
//! - `CAFE_HOST` - Bind address (default: 127.0.0.1)
//! - `CAFE_PORT` - Listen port (default: 5000)
//! - `CAFE_API_KEY` - Shared secret required by the delete endpoint (default: hello)
//! - `CAFE_DB_MAX_CONNECTIONS` - Connection pool size (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://cafes.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "5000";
const DEFAULT_MAX_CONNECTIONS: &str = "5";

/// Delete key used when `CAFE_API_KEY` is not set.
pub const DEFAULT_API_KEY: &str = "hello";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite database URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shared secret compared against the `api-key` query parameter on delete
    pub api_key: SecretString,
    /// Maximum number of pooled database connections
    pub max_connections: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("CAFE_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let host = parse_var(&lookup, "CAFE_HOST", DEFAULT_HOST)?;
        let port = parse_var(&lookup, "CAFE_PORT", DEFAULT_PORT)?;
        let max_connections =
            parse_var(&lookup, "CAFE_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let api_key = SecretString::from(
            lookup("CAFE_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
        );
        if api_key.expose_secret().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CAFE_API_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            api_key,
            max_connections,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Check a caller-supplied delete key against the configured secret.
    ///
    /// Plain exact comparison; there is no hashing or rotation.
    #[must_use]
    pub fn api_key_matches(&self, candidate: Option<&str>) -> bool {
        candidate == Some(self.api_key.expose_secret())
    }
}

/// Parse a variable, falling back to `default` when unset.
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

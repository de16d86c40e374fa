//! Store configuration loaded from the process environment.
//!
//! The connection pool is built once from a [`StoreConfig`] and handed to the
//! planning services; nothing here holds global state.

use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "TASKBOARD_DATABASE_URL";

/// Environment variable holding the maximum pool size.
pub const MAX_CONNECTIONS_VAR: &str = "TASKBOARD_DB_MAX_CONNECTIONS";

/// Environment variable holding the connection timeout in seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "TASKBOARD_DB_CONNECT_TIMEOUT_SECS";

const DEFAULT_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("environment variable {0} is required")]
    MissingVariable(&'static str),

    /// A variable is set but cannot be used.
    #[error("environment variable {name} has invalid value '{value}': {reason}")]
    InvalidVariable {
        /// Variable name.
        name: &'static str,
        /// Raw value found.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Connection settings for the `PostgreSQL` planning store.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taskboard::config::StoreConfig;
///
/// let config = StoreConfig::new("postgres://localhost/taskboard")
///     .with_max_connections(2)
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_connections(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    database_url: String,
    max_connections: u32,
    connection_timeout: Duration,
}

impl StoreConfig {
    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets how long to wait for a pooled connection.
    #[must_use]
    pub const fn with_connection_timeout(mut self, connection_timeout: Duration) -> Self {
        self.connection_timeout = connection_timeout;
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or a numeric
    /// setting is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or a numeric
    /// setting is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingVariable(DATABASE_URL_VAR))?;

        let mut config = Self::new(database_url);
        if let Some(raw) = lookup(MAX_CONNECTIONS_VAR) {
            config.max_connections = parse_positive(MAX_CONNECTIONS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(CONNECT_TIMEOUT_VAR) {
            let seconds: u32 = parse_positive(CONNECT_TIMEOUT_VAR, &raw)?;
            config.connection_timeout = Duration::from_secs(u64::from(seconds));
        }
        Ok(config)
    }

    /// Returns the connection URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Returns the pool checkout timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason| ConfigError::InvalidVariable {
        name,
        value: raw.to_owned(),
        reason,
    };
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("expected an unsigned integer"))?;
    if value == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(value)
}

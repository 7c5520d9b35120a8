//! Connection settings for the `PostgreSQL` entity store.

use super::TrackerPgPool;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::sync::Arc;
use thiserror::Error;

/// Environment variable holding the database URL.
pub const DATABASE_URL_ENV: &str = "TASKTRACK_DATABASE_URL";

/// Environment variable holding the maximum pool size.
pub const MAX_CONNECTIONS_ENV: &str = "TASKTRACK_DB_MAX_CONNECTIONS";

/// Pool size used when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Errors raised while reading store settings or building the pool.
#[derive(Debug, Clone, Error)]
pub enum StoreConfigError {
    /// The database URL is unset or blank.
    #[error("TASKTRACK_DATABASE_URL must be set to a PostgreSQL connection URL")]
    MissingDatabaseUrl,

    /// The pool size is not a positive integer.
    #[error("invalid maximum connection count '{0}', expected a positive integer")]
    InvalidMaxConnections(String),

    /// The pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(Arc<dyn std::error::Error + Send + Sync>),
}

/// Settings for [`super::PostgresTrackerStore`] connection pooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    database_url: String,
    max_connections: u32,
}

impl StoreConfig {
    /// Creates settings for `database_url` with the default pool size.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`StoreConfig::from_lookup`].
    pub fn from_env() -> Result<Self, StoreConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError::MissingDatabaseUrl`] when
    /// [`DATABASE_URL_ENV`] is unset or blank, and
    /// [`StoreConfigError::InvalidMaxConnections`] when
    /// [`MAX_CONNECTIONS_ENV`] is set to anything but a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreConfigError> {
        let database_url = lookup(DATABASE_URL_ENV)
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .ok_or(StoreConfigError::MissingDatabaseUrl)?;

        let max_connections = match lookup(MAX_CONNECTIONS_ENV) {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => parse_max_connections(&raw)?,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }

    /// Returns the database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Builds a connection pool, establishing its initial connections.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError::InvalidMaxConnections`] for a zero pool
    /// size and [`StoreConfigError::Pool`] when the database is unreachable.
    pub fn build_pool(&self) -> Result<TrackerPgPool, StoreConfigError> {
        if self.max_connections == 0 {
            return Err(StoreConfigError::InvalidMaxConnections(
                self.max_connections.to_string(),
            ));
        }
        let manager = ConnectionManager::<PgConnection>::new(self.database_url.as_str());
        Pool::builder()
            .max_size(self.max_connections)
            .build(manager)
            .map_err(|err| StoreConfigError::Pool(Arc::new(err)))
    }
}

fn parse_max_connections(raw: &str) -> Result<u32, StoreConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|count| *count > 0)
        .ok_or_else(|| StoreConfigError::InvalidMaxConnections(raw.to_owned()))
}

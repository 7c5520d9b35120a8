//! `PostgreSQL` adapters for tracker persistence.

mod config;
mod models;
mod schema;
mod store;

pub use config::{
    DATABASE_URL_ENV, DEFAULT_MAX_CONNECTIONS, MAX_CONNECTIONS_ENV, StoreConfig, StoreConfigError,
};
pub use store::{PostgresTrackerStore, TrackerPgPool};

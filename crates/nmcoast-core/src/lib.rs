//! Shared types and logic for the NM COAST counter map: counter/datastream
//! models, the in-memory counter store, search matching, CSV encoding, and
//! application configuration.

pub mod app_config;
pub mod config;
pub mod counters;
pub mod csv;
pub mod search;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use counters::{Count, Counter, CounterStore, Datastream, DatastreamDirection, DatastreamType};

/// Errors raised while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

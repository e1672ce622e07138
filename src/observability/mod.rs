//! Logging setup
//!
//! Structured logs go to stderr through `tracing-subscriber`. `RUST_LOG`
//! overrides the configured filter when set.

use tracing_subscriber::EnvFilter;

/// Default filter directive when neither config nor environment set one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Observability error
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Parse a filter directive without installing it
pub fn parse_filter(filter: &str) -> Result<EnvFilter, ObservabilityError> {
    EnvFilter::try_new(filter).map_err(|e| ObservabilityError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber. Call once per process.
pub fn init_logging(filter: &str) -> Result<(), ObservabilityError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => parse_filter(filter)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))
}

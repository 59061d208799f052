//! Tracing subscriber setup

use crate::config::LoggingConfig;
use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins over the configured level when set. Returns an error if
/// the configured directive is invalid or a global subscriber is already
/// installed; callers that may initialize twice (tests) can ignore the latter.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Internal(format!("Tracing subscriber already set: {}", e)))
}

//! Tracing setup: filter, format, and installation of the global subscriber.

pub mod events;
pub mod spans;

use kb_core::config::ObservabilityConfig;
use kb_core::errors::{KbError, KbResult};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `observability.log_level`.
pub const LOG_ENV: &str = "KB_LOG";

/// Build the filter: `KB_LOG` if set and valid, else the configured level.
pub fn build_filter(config: &ObservabilityConfig) -> KbResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|e| KbError::Config {
        reason: format!("invalid log level '{}': {e}", config.log_level),
    })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> KbResult<()> {
    let filter = build_filter(config)?;
    let result = if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };
    result.map_err(|e| KbError::Config {
        reason: format!("install tracing subscriber: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_directive_strings() {
        let config = ObservabilityConfig {
            log_level: "kb_service=debug,kb_storage=warn".into(),
            json: false,
        };
        assert!(build_filter(&config).is_ok());
    }
}

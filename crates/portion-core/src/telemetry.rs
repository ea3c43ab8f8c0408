//! Subscriber setup for binaries and integration tests.

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` wins over `config.log_filter`. Returns `false` when a global
/// subscriber was already installed; the existing one is left in place.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));

    let installed = if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };

    if installed.is_ok() {
        debug!(json = config.json, filter = %config.log_filter, "tracing initialized");
    }
    installed.is_ok()
}

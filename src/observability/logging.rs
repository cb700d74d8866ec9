//! Structured logging.
//!
//! The SDK only emits `tracing` events. Applications that already install a
//! subscriber need nothing from here; `init_logging` is for binaries and
//! tests that want the same setup the SDK is developed with.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::ObservabilityConfig;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `default_level`. Returns `false` when a global
/// subscriber was already installed, which is left untouched.
pub fn init_logging(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("langfuse={default_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// Install logging from the observability section of the config.
pub fn init_from_config(config: &ObservabilityConfig) -> bool {
    init_logging(&config.log_level)
}

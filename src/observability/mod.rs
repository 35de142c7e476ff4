//! # Observability
//!
//! Structured logging setup on the tracing ecosystem. Honors `RUST_LOG` when
//! set; `--verbose` lowers the default level, and JSON output is a config
//! switch for machine-ingested logs.

use crate::config::ObservabilityConfig;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialise the global tracing subscriber.
///
/// Safe to call more than once: a subscriber already installed (integration
/// tests, embedding binaries) wins silently.
pub fn init_logging(config: &ObservabilityConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", default_level);
    }
    let filter = EnvFilter::from_default_env();

    // A subscriber already installed elsewhere wins; ignore the error.
    let _ = if config.log_json {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder().with_env_filter(filter).json().finish(),
        )
    } else {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder().with_env_filter(filter).finish(),
        )
    };
}

//! Logging setup.
//!
//! Game and handler code logs through the `log` macros, picked up by
//! `env_logger`. The HTTP trace layer emits `tracing` spans, which go to a
//! `tracing-subscriber` formatter. Both honour `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Installs both loggers. `default_filter` applies when `RUST_LOG` is unset.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(default_filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::new().default_filter_or(default_filter))
        .try_init();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_filter},tower_http=debug")));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    log::info!("Logging initialized");
}

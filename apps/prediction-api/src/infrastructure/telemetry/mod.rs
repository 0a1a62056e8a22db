//! Tracing Setup
//!
//! Structured logging via `tracing` with an environment-driven filter.
//! Defaults to `info` when `RUST_LOG` is unset.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Called once at startup; later calls are ignored, so tests that also
/// initialize logging do not panic.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

//! Logging initialization
//!
//! Hosts embedding the engine usually bring their own subscriber; this is the
//! convenience setup for binaries and tests that do not.

use tracing_subscriber::EnvFilter;

/// Initialize a global `tracing` subscriber
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once; only the first call installs a subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

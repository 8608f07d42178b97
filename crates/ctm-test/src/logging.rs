//! Tracing setup for tests and benches

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install a test-friendly subscriber.
///
/// Filters come from `RUST_LOG`, falling back to `info`. Safe to call
/// from every test; only the first call installs anything, and a subscriber
/// installed elsewhere is left alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer().with_target(true))
            .with(filter)
            .try_init();
    });
}

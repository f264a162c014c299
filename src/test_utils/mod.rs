//! Test utilities for the GuruSDK CLI.
//!
//! Compiled only for unit tests and for integration tests via the
//! `test-utils` feature. Keeps test-only helpers out of release builds.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Ensures the tracing subscriber is installed at most once across tests.
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Respects `RUST_LOG` when set, otherwise stays quiet so test output is
/// readable. Safe to call from every test; only the first call installs
/// the subscriber.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

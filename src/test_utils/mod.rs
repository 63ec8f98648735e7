//! Test utilities for connector-lib
//!
//! Helpers shared by unit tests and the integration suite: once-only logging
//! initialization and temporary connector libraries written to disk.
//!
//! Available under `cfg(test)` and with the `test-utils` feature.

pub mod fixtures;

pub use fixtures::ConnectorFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call installs a subscriber. It uses `level` when given,
/// otherwise `RUST_LOG` when set; with neither, tests run without logging.
///
/// # Example
///
/// ```rust,no_run
/// use tracing::Level;
///
/// connector_lib::test_utils::init_test_logging(Some(Level::DEBUG));
/// ```
///
/// To enable logging in tests via environment variable:
/// ```bash
/// RUST_LOG=connector_lib=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

//! Shared test support: logging setup, canned producers, and descriptor
//! builders.
//!
//! Compiled into unit tests and, behind the `test-utils` feature, into the
//! integration suite.

use std::sync::Once;

use tracing::Level;
use tracing_subscriber::EnvFilter;

mod fixtures;
mod producers;

pub use fixtures::{descriptor, redirect_to};
pub use producers::{
    CountingTextProducer, FailingProducer, FixtureError, MapProducer, TextProducer,
};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber at most once regardless of how many
/// times it's called. It respects the `RUST_LOG` environment variable if
/// set, or uses the provided log level.
///
/// # Arguments
///
/// * `level` - Optional log level to use. If None, uses `RUST_LOG`
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            // No logging if neither is provided
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer() // Important: uses test-compatible writer
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

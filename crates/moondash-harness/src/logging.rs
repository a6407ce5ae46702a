//! Logging setup for tests.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize logging for tests: terminal only, no file output.
///
/// Uses `try_init` so it doesn't panic if already initialized (safe to
/// call from multiple `#[test]` functions).
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_test_writer()
                .compact(),
        )
        .try_init();
}

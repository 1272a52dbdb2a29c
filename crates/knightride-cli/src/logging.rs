//! stderr logging for the binary.

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// Level used until the configured `log_level` is known.
pub const STARTUP_LEVEL: &str = "warn";

/// `RUST_LOG` if set, otherwise `default_level`.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(STARTUP_LEVEL))
}

/// Subscriber for code that runs before the global one is installed.
pub fn startup_subscriber() -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(STARTUP_LEVEL))
        .with_writer(std::io::stderr)
        .finish()
}

/// Installs the global subscriber.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .try_init();
}

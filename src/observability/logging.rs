//! Subscriber setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "RUST_LOG";

/// Picks the filter directive: a non-empty `RUST_LOG` wins over the configured one.
pub fn resolve_filter(env_value: Option<&str>, configured: &str) -> String {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => configured.to_string(),
    }
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(configured: &str) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = resolve_filter(env_value.as_deref(), configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

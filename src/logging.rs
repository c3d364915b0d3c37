use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter (e.g. `reductor=debug`).
pub const LOG_ENV: &str = "REDUCTOR_LOG";

/// Initialize tracing to stderr.
///
/// The filter comes from `REDUCTOR_LOG`, falling back to `default_filter`.
/// A second call is a no-op.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}

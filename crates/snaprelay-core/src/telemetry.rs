use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with an env-filterable fmt subscriber.
///
/// Safe to call more than once; later calls are no-ops (tests share one
/// process-wide subscriber).
pub fn init_telemetry() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "snaprelay=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

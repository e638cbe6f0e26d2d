use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured JSON tracing on stdout. Call once at service startup.
///
/// Directives come from `RUST_LOG`. When it is unset or unparsable, `fallback` is used
/// instead, so a typo in the environment never silences the service. Later calls are no-ops.
pub fn init_tracing(fallback: &str) {
    let raw = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::registry()
        .with(env_filter(raw.as_deref(), fallback))
        .with(fmt::layer().json())
        .try_init();
}

fn env_filter(raw: Option<&str>, fallback: &str) -> EnvFilter {
    raw.and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

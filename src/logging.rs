use std::env::var;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogConfig, LogFormat};

/// Installs the global subscriber. `RUST_LOG` and `RUST_LOG_FORMAT` take
/// precedence over the config file; the default level is `warn`. Events go to
/// stderr so stdout stays a single JSON document.
pub fn init(config: &LogConfig) {
    let env_filter = match var("RUST_LOG").ok().or_else(|| config.filter.clone()) {
        Some(directives) => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .parse_lossy(directives),
        None => EnvFilter::new(LevelFilter::WARN.to_string()),
    };

    let log_format = resolve_format(var("RUST_LOG_FORMAT").ok().as_deref(), config.format);

    let log_layer = match log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
    };

    // A subscriber may already be installed when embedded in a host process.
    let _ = tracing_subscriber::registry().with(log_layer).try_init();
}

/// Only recognized `RUST_LOG_FORMAT` values override the configured format.
fn resolve_format(env: Option<&str>, configured: Option<LogFormat>) -> LogFormat {
    match env.map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
        Some(value) if value.eq_ignore_ascii_case("compact") => LogFormat::Compact,
        _ => configured.unwrap_or_default(),
    }
}

//! Logging setup for Parley
//!
//! Installs a `tracing-subscriber` fmt layer, human-readable or JSON, filtered
//! by `RUST_LOG` when set and by the configured directive otherwise.

use parley_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber
///
/// # Errors
///
/// Returns an error if the configured filter is invalid or a global
/// subscriber is already installed
pub fn init(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), &config.log_filter)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => registry.with(fmt_layer).try_init(),
        LogFormat::Json => registry.with(fmt_layer.json()).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// `RUST_LOG` wins over the configured directive when it parses
fn build_filter(env_directive: Option<&str>, configured: &str) -> anyhow::Result<EnvFilter> {
    if let Some(filter) = env_directive.and_then(|directive| EnvFilter::try_new(directive).ok()) {
        return Ok(filter);
    }

    EnvFilter::try_new(configured).map_err(|e| anyhow::anyhow!("invalid log filter `{configured}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter() {
        let filter = build_filter(None, "parley_llm=debug,info").unwrap();
        assert_eq!(filter.to_string(), "parley_llm=debug,info");
    }

    #[test]
    fn env_directive_wins() {
        let filter = build_filter(Some("warn"), "debug").unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn invalid_configured_filter() {
        let err = build_filter(None, "parley_llm=loud").unwrap_err();
        assert!(err.to_string().contains("invalid log filter"));
    }
}

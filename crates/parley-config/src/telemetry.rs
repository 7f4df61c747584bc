use serde::Deserialize;

/// `[telemetry]` section of the configuration file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// `tracing-subscriber` filter directive (overridden by `RUST_LOG`)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Output format for log lines
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Log line format
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

fn default_log_filter() -> String {
    "info".to_owned()
}

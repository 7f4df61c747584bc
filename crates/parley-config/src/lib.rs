#![allow(clippy::must_use_candidate)]

pub mod ai;
mod env;
mod loader;
pub mod provider;
pub mod telemetry;

use serde::Deserialize;

pub use ai::*;
pub use env::ExpandError;
pub use provider::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level Parley configuration
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// AI provider configuration
    #[serde(default)]
    pub ai: AiSettings,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

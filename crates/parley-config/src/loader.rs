use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        tracing::debug!(path = %path.display(), "loading configuration");

        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable expansion fails, TOML
    /// parsing fails, or validation fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a provider block or the default provider name
    /// is malformed
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_ai_config()?;
        self.validate_telemetry_config()?;
        Ok(())
    }

    fn validate_ai_config(&self) -> anyhow::Result<()> {
        if let Some(ref default) = self.ai.default_provider
            && default.trim().is_empty()
        {
            anyhow::bail!("ai.default_provider must not be empty when set");
        }

        for (name, provider) in &self.ai.providers {
            if name.trim().is_empty() {
                anyhow::bail!("provider names must not be empty");
            }

            if provider.model.chars().any(char::is_whitespace) {
                anyhow::bail!("model for provider '{name}' must not contain whitespace");
            }
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        if self.telemetry.log_filter.trim().is_empty() {
            anyhow::bail!("telemetry.log_filter must not be empty");
        }

        Ok(())
    }
}

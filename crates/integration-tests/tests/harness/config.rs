//! Provider configuration pointed at a mock backend

use parley_config::{Config, ProviderConfig};

/// API key variable used by every integration test
pub const TEST_KEY_ENV: &str = "PARLEY_IT_API_KEY";

/// Parse a TOML document and resolve one provider with its built-in defaults
pub fn resolve(toml: &str, provider: &str) -> ProviderConfig {
    let config = Config::from_toml_str(toml).expect("valid test configuration");
    let defaults = parley_llm::builtin_defaults(provider).expect("built-in provider");
    ProviderConfig::resolve(&config.ai, provider, &defaults)
}

/// Enabled provider with `base_url` and the test API key variable
pub fn provider(provider: &str, base_url: &str, model: Option<&str>) -> ProviderConfig {
    let model = model.map(|m| format!("model = \"{m}\"\n")).unwrap_or_default();
    let toml = format!(
        "[ai]\nenabled = true\n\n[ai.providers.{provider}]\n{model}api_key_env = \"{TEST_KEY_ENV}\"\nbase_url = \"{base_url}\"\n"
    );
    resolve(&toml, provider)
}

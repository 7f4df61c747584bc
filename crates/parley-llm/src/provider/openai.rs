//! `OpenAI` chat completions provider

use parley_config::{ProviderConfig, ProviderDefaults};

use super::{AdapterClient, Auth, Client, HttpTransport, ProviderRegistry};
use crate::convert::openai::{Compatible, OpenAiAdapter};
use crate::error::LlmError;

/// Registry name
pub const PROVIDER_NAME: &str = "openai";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default API key environment variable
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default output token cap
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Built-in defaults
pub const fn defaults() -> ProviderDefaults {
    ProviderDefaults {
        model: DEFAULT_MODEL,
        api_key_env: DEFAULT_API_KEY_ENV,
        max_tokens: DEFAULT_MAX_TOKENS,
        base_url: DEFAULT_BASE_URL,
    }
}

/// Create a client from resolved configuration
///
/// # Errors
///
/// Fails when AI is disabled, the API key is missing or the base URL is
/// invalid.
pub fn new_client(config: &ProviderConfig) -> Result<AdapterClient<OpenAiAdapter>, LlmError> {
    super::ensure_enabled(PROVIDER_NAME, config)?;
    let api_key = super::resolve_api_key(PROVIDER_NAME, config)?;
    let url = super::endpoint(PROVIDER_NAME, &config.base_url, DEFAULT_BASE_URL, "chat/completions")?;

    let adapter = OpenAiAdapter::new(Compatible::new(PROVIDER_NAME), &config.model, config.max_tokens);

    Ok(AdapterClient::new(adapter, HttpTransport::new(url, Auth::Bearer(api_key)), config))
}

/// Register the provider factory
pub fn register(registry: &ProviderRegistry) {
    registry.register(PROVIDER_NAME, |_ctx, config| async move {
        new_client(&config).map(|client| Box::new(client) as Box<dyn Client>)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::tests::config;

    #[test]
    fn default_constants() {
        assert_eq!(defaults().model, "gpt-4o");
        assert_eq!(defaults().api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn disabled() {
        let mut config = config(DEFAULT_MODEL);
        config.enabled = false;

        assert!(matches!(new_client(&config), Err(LlmError::Disabled { .. })));
    }

    #[test]
    fn client_getters() {
        temp_env::with_var("PARLEY_TEST_KEY", Some("sk-test"), || {
            let client = new_client(&config("gpt-5")).unwrap();

            assert_eq!(client.provider(), "openai");
            assert_eq!(client.model(), "gpt-5");
        });
    }
}

//! Anthropic Messages API provider

use parley_config::{ProviderConfig, ProviderDefaults};

use super::{AdapterClient, Auth, Client, HttpTransport, ProviderRegistry};
use crate::convert::anthropic::AnthropicAdapter;
use crate::error::LlmError;

/// Registry name
pub const PROVIDER_NAME: &str = "anthropic";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default API key environment variable
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Default output token cap
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// `anthropic-version` header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

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
pub fn new_client(config: &ProviderConfig) -> Result<AdapterClient<AnthropicAdapter>, LlmError> {
    super::ensure_enabled(PROVIDER_NAME, config)?;
    let api_key = super::resolve_api_key(PROVIDER_NAME, config)?;
    let url = super::endpoint(PROVIDER_NAME, &config.base_url, DEFAULT_BASE_URL, "messages")?;

    let transport =
        HttpTransport::new(url, Auth::header("x-api-key", api_key)).with_header("anthropic-version", ANTHROPIC_VERSION);
    let adapter = AnthropicAdapter::new(PROVIDER_NAME, &config.model, config.max_tokens, config.cache);

    Ok(AdapterClient::new(adapter, transport, config))
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
        assert_eq!(PROVIDER_NAME, "anthropic");
        assert_eq!(defaults().model, "claude-sonnet-4-20250514");
        assert_eq!(defaults().api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(defaults().max_tokens, 4096);
    }

    #[test]
    fn client_getters() {
        temp_env::with_var("PARLEY_TEST_KEY", Some("sk-ant-test"), || {
            let client = new_client(&config("claude-3-5-haiku-20241022")).unwrap();

            assert_eq!(client.provider(), "anthropic");
            assert_eq!(client.model(), "claude-3-5-haiku-20241022");
            assert_eq!(client.max_tokens(), 1024);
        });
    }

    #[test]
    fn missing_api_key() {
        temp_env::with_var_unset("PARLEY_TEST_KEY", || {
            let err = new_client(&config(DEFAULT_MODEL)).unwrap_err();
            assert!(matches!(err, LlmError::CredentialMissing { .. }));
        });
    }
}

//! Ollama provider (`OpenAI`-compatible, usually local)

use parley_config::{ProviderConfig, ProviderDefaults};

use super::{AdapterClient, Auth, Client, HttpTransport, ProviderRegistry};
use crate::convert::openai::{Compatible, OpenAiAdapter};
use crate::error::LlmError;

/// Registry name
pub const PROVIDER_NAME: &str = "ollama";

/// Default model
pub const DEFAULT_MODEL: &str = "llama3.3:70b";

/// Default API key environment variable
pub const DEFAULT_API_KEY_ENV: &str = "OLLAMA_API_KEY";

/// Default output token cap
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default local endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

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
/// A local server needs no key; one is sent only when the variable is set.
///
/// # Errors
///
/// Fails when AI is disabled or the base URL is invalid.
pub fn new_client(config: &ProviderConfig) -> Result<AdapterClient<OpenAiAdapter>, LlmError> {
    super::ensure_enabled(PROVIDER_NAME, config)?;
    let url = super::endpoint(PROVIDER_NAME, &config.base_url, DEFAULT_BASE_URL, "chat/completions")?;

    let auth = super::resolve_api_key(PROVIDER_NAME, config).map_or(Auth::None, Auth::Bearer);
    let adapter = OpenAiAdapter::new(Compatible::new(PROVIDER_NAME), &config.model, config.max_tokens);

    Ok(AdapterClient::new(adapter, HttpTransport::new(url, auth), config))
}

/// Register the provider factory
pub fn register(registry: &ProviderRegistry) {
    registry.register(PROVIDER_NAME, |_ctx, config| async move {
        new_client(&config).map(|client| Box::new(client) as Box<dyn Client>)
    });
}

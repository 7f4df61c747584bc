//! Google Gemini provider

use parley_config::{ProviderConfig, ProviderDefaults};

use super::{AdapterClient, Auth, Client, HttpTransport, ProviderRegistry};
use crate::convert::google::GeminiAdapter;
use crate::error::LlmError;

/// Registry name
pub const PROVIDER_NAME: &str = "gemini";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// Default API key environment variable
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default output token cap
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

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
pub fn new_client(config: &ProviderConfig) -> Result<AdapterClient<GeminiAdapter>, LlmError> {
    super::ensure_enabled(PROVIDER_NAME, config)?;
    let api_key = super::resolve_api_key(PROVIDER_NAME, config)?;

    let path = format!("models/{}:generateContent", config.model);
    let url = super::endpoint(PROVIDER_NAME, &config.base_url, DEFAULT_BASE_URL, &path)?;

    Ok(AdapterClient::new(
        GeminiAdapter::new(PROVIDER_NAME, config.max_tokens),
        HttpTransport::new(url, Auth::header("x-goog-api-key", api_key)),
        config,
    ))
}

/// Register the provider factory
pub fn register(registry: &ProviderRegistry) {
    registry.register(PROVIDER_NAME, |_ctx, config| async move {
        new_client(&config).map(|client| Box::new(client) as Box<dyn Client>)
    });
}

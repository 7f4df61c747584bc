//! Azure `OpenAI` provider
//!
//! The configured model is the deployment name; the resource endpoint must be
//! supplied as `base_url`.

use parley_config::{ProviderConfig, ProviderDefaults};

use super::{AdapterClient, Auth, Client, HttpTransport, ProviderRegistry};
use crate::convert::openai::{Compatible, OpenAiAdapter};
use crate::error::LlmError;

/// Registry name
pub const PROVIDER_NAME: &str = "azureopenai";

/// Default deployment name
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default API key environment variable
pub const DEFAULT_API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";

/// Default output token cap
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// REST API version sent as a query parameter
pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";

/// Built-in defaults (no base URL: every resource has its own)
pub const fn defaults() -> ProviderDefaults {
    ProviderDefaults {
        model: DEFAULT_MODEL,
        api_key_env: DEFAULT_API_KEY_ENV,
        max_tokens: DEFAULT_MAX_TOKENS,
        base_url: "",
    }
}

/// Create a client from resolved configuration
///
/// # Errors
///
/// Fails when AI is disabled, the base URL is missing or invalid, or the API
/// key is missing.
pub fn new_client(config: &ProviderConfig) -> Result<AdapterClient<OpenAiAdapter>, LlmError> {
    super::ensure_enabled(PROVIDER_NAME, config)?;

    if config.base_url.is_empty() {
        return Err(LlmError::InvalidConfig {
            provider: PROVIDER_NAME.to_owned(),
            reason: "base URL is required (e.g. https://<resource>.openai.azure.com)".to_owned(),
        });
    }

    let api_key = super::resolve_api_key(PROVIDER_NAME, config)?;

    let path = format!("openai/deployments/{}/chat/completions", config.model);
    let mut url = super::endpoint(PROVIDER_NAME, &config.base_url, "", &path)?;
    url.query_pairs_mut().append_pair("api-version", DEFAULT_API_VERSION);

    let adapter = OpenAiAdapter::new(Compatible::new(PROVIDER_NAME), &config.model, config.max_tokens);

    Ok(AdapterClient::new(
        adapter,
        HttpTransport::new(url, Auth::header("api-key", api_key)),
        config,
    ))
}

/// Register the provider factory
pub fn register(registry: &ProviderRegistry) {
    registry.register(PROVIDER_NAME, |_ctx, config| async move {
        new_client(&config).map(|client| Box::new(client) as Box<dyn Client>)
    });
}

//! AWS Bedrock provider for Anthropic models
//!
//! Credentials come from the AWS default chain; `base_url` carries the region.

use parley_config::{ProviderConfig, ProviderDefaults};

use super::{AdapterClient, BedrockTransport, Client, ProviderRegistry};
use crate::convert::anthropic::BedrockAdapter;
use crate::error::LlmError;

/// Registry name
pub const PROVIDER_NAME: &str = "bedrock";

/// Default model
pub const DEFAULT_MODEL: &str = "anthropic.claude-sonnet-4-20250514-v2:0";

/// Default output token cap
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default AWS region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Built-in defaults
pub const fn defaults() -> ProviderDefaults {
    ProviderDefaults {
        model: DEFAULT_MODEL,
        api_key_env: "",
        max_tokens: DEFAULT_MAX_TOKENS,
        base_url: DEFAULT_REGION,
    }
}

/// Region named by the configuration, falling back to the default
pub fn region(config: &ProviderConfig) -> &str {
    if config.base_url.is_empty() {
        DEFAULT_REGION
    } else {
        &config.base_url
    }
}

/// Create a client from resolved configuration
///
/// # Errors
///
/// Fails when AI is disabled.
pub async fn new_client(config: &ProviderConfig) -> Result<AdapterClient<BedrockAdapter>, LlmError> {
    super::ensure_enabled(PROVIDER_NAME, config)?;

    let region = region(config);
    tracing::debug!(provider = PROVIDER_NAME, region, model = %config.model, "building Bedrock client");

    let transport = BedrockTransport::new(region, &config.model).await;

    Ok(AdapterClient::new(
        BedrockAdapter::new(PROVIDER_NAME, config.max_tokens),
        transport,
        config,
    ))
}

/// Register the provider factory
pub fn register(registry: &ProviderRegistry) {
    registry.register(PROVIDER_NAME, |_ctx, config| async move {
        new_client(&config)
            .await
            .map(|client| Box::new(client) as Box<dyn Client>)
    });
}

use indexmap::IndexMap;
use serde::Deserialize;

/// `[ai]` section of the configuration file
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiSettings {
    /// Master switch for every provider
    #[serde(default)]
    pub enabled: bool,
    /// Provider used when the caller does not name one
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Per-provider override blocks keyed by provider name
    #[serde(default)]
    pub providers: IndexMap<String, ProviderSettings>,
}

/// Override block for a single provider
///
/// Zero and empty values mean "not set": the provider default is kept.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// Model identifier
    #[serde(default)]
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default)]
    pub api_key_env: String,
    /// Output token cap
    #[serde(default)]
    pub max_tokens: u32,
    /// Endpoint override (the AWS region for Bedrock)
    #[serde(default)]
    pub base_url: String,
    /// Prompt caching preferences
    #[serde(default)]
    pub cache: Option<CacheSettings>,
}

/// Prompt caching preferences as written in the file
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSettings {
    /// Global caching switch for the provider
    #[serde(default)]
    pub enabled: bool,
    /// Mark the system prompt block as cacheable
    #[serde(default)]
    pub cache_system_prompt: bool,
    /// Mark the project memory block as cacheable
    #[serde(default)]
    pub cache_project_memory: bool,
}

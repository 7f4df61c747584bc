use crate::ai::{AiSettings, CacheSettings, ProviderSettings};

/// Built-in defaults a provider module ships with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDefaults {
    /// Default model identifier
    pub model: &'static str,
    /// Default API key environment variable (empty when no key is needed)
    pub api_key_env: &'static str,
    /// Default output token cap
    pub max_tokens: u32,
    /// Default endpoint (empty when the provider derives it elsewhere)
    pub base_url: &'static str,
}

/// Effective configuration handed to a provider constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Whether AI features are enabled at all
    pub enabled: bool,
    /// Model identifier
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Output token cap
    pub max_tokens: u32,
    /// Endpoint override, or the AWS region for Bedrock
    pub base_url: String,
    /// Resolved prompt caching preferences
    pub cache: CacheConfig,
}

/// Resolved prompt caching preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Global gate; per-block flags have no effect when this is off
    pub enabled: bool,
    /// Request caching for the system prompt block
    pub system_prompt: bool,
    /// Request caching for the project memory block
    pub project_memory: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            system_prompt: true,
            project_memory: true,
        }
    }
}

impl CacheConfig {
    /// All caching turned off
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            system_prompt: false,
            project_memory: false,
        }
    }

    /// Resolve file settings into effective preferences
    ///
    /// An absent block keeps everything on. An explicit `enabled = false`
    /// turns everything off. When enabled without any per-block flag, both
    /// blocks are cached.
    pub fn from_settings(settings: Option<&CacheSettings>) -> Self {
        match settings {
            None => Self::default(),
            Some(s) if !s.enabled => Self::disabled(),
            Some(s) if !s.cache_system_prompt && !s.cache_project_memory => Self::default(),
            Some(s) => Self {
                enabled: true,
                system_prompt: s.cache_system_prompt,
                project_memory: s.cache_project_memory,
            },
        }
    }

    /// Whether the system prompt block should carry a caching hint
    pub const fn hint_system_prompt(&self) -> bool {
        self.enabled && self.system_prompt
    }

    /// Whether the project memory block should carry a caching hint
    pub const fn hint_project_memory(&self) -> bool {
        self.enabled && self.project_memory
    }
}

impl ProviderConfig {
    /// Provider defaults with AI disabled and no overrides applied
    pub fn from_defaults(defaults: &ProviderDefaults) -> Self {
        Self {
            enabled: false,
            model: defaults.model.to_owned(),
            api_key_env: defaults.api_key_env.to_owned(),
            max_tokens: defaults.max_tokens,
            base_url: defaults.base_url.to_owned(),
            cache: CacheConfig::default(),
        }
    }

    /// Merge a provider's defaults with its override block from `[ai]`
    pub fn resolve(settings: &AiSettings, provider: &str, defaults: &ProviderDefaults) -> Self {
        let mut config = Self::from_defaults(defaults);
        config.enabled = settings.enabled;

        if let Some(overrides) = settings.providers.get(provider) {
            config.apply(overrides);
        }

        config
    }

    fn apply(&mut self, overrides: &ProviderSettings) {
        if !overrides.model.is_empty() {
            self.model.clone_from(&overrides.model);
        }
        if !overrides.api_key_env.is_empty() {
            self.api_key_env.clone_from(&overrides.api_key_env);
        }
        if overrides.max_tokens > 0 {
            self.max_tokens = overrides.max_tokens;
        }
        if !overrides.base_url.is_empty() {
            self.base_url.clone_from(&overrides.base_url);
        }
        self.cache = CacheConfig::from_settings(overrides.cache.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    const DEFAULTS: ProviderDefaults = ProviderDefaults {
        model: "gemini-2.0-flash-exp",
        api_key_env: "GEMINI_API_KEY",
        max_tokens: 8192,
        base_url: "",
    };

    fn settings(enabled: bool, overrides: Option<ProviderSettings>) -> AiSettings {
        let mut providers = IndexMap::new();
        if let Some(overrides) = overrides {
            providers.insert("gemini".to_owned(), overrides);
        }
        AiSettings {
            enabled,
            default_provider: None,
            providers,
        }
    }

    #[test]
    fn defaults_when_no_override_block() {
        let config = ProviderConfig::resolve(&AiSettings::default(), "gemini", &DEFAULTS);

        assert!(!config.enabled);
        assert_eq!(config.model, "gemini-2.0-flash-exp");
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.max_tokens, 8192);
        assert_eq!(config.base_url, "");
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn full_override() {
        let overrides = ProviderSettings {
            model: "gemini-1.5-pro".to_owned(),
            api_key_env: "CUSTOM_GEMINI_KEY".to_owned(),
            max_tokens: 16384,
            base_url: "https://gemini.internal/v1beta".to_owned(),
            cache: None,
        };
        let config = ProviderConfig::resolve(&settings(true, Some(overrides)), "gemini", &DEFAULTS);

        assert!(config.enabled);
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.api_key_env, "CUSTOM_GEMINI_KEY");
        assert_eq!(config.max_tokens, 16384);
        assert_eq!(config.base_url, "https://gemini.internal/v1beta");
    }

    #[test]
    fn zero_and_empty_keep_defaults() {
        let overrides = ProviderSettings {
            model: "gemini-1.5-flash".to_owned(),
            ..ProviderSettings::default()
        };
        let config = ProviderConfig::resolve(&settings(true, Some(overrides)), "gemini", &DEFAULTS);

        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.max_tokens, 8192);
    }

    #[test]
    fn other_provider_block_is_ignored() {
        let mut ai = settings(true, None);
        ai.providers.insert(
            "openai".to_owned(),
            ProviderSettings {
                model: "gpt-4o".to_owned(),
                ..ProviderSettings::default()
            },
        );
        let config = ProviderConfig::resolve(&ai, "gemini", &DEFAULTS);

        assert_eq!(config.model, "gemini-2.0-flash-exp");
    }

    #[test]
    fn cache_absent_keeps_everything_on() {
        assert_eq!(CacheConfig::from_settings(None), CacheConfig::default());
    }

    #[test]
    fn cache_explicitly_disabled_turns_everything_off() {
        let settings = CacheSettings {
            enabled: false,
            cache_system_prompt: true,
            cache_project_memory: true,
        };
        let cache = CacheConfig::from_settings(Some(&settings));

        assert_eq!(cache, CacheConfig::disabled());
        assert!(!cache.hint_system_prompt());
        assert!(!cache.hint_project_memory());
    }

    #[test]
    fn cache_enabled_without_flags_caches_both() {
        let settings = CacheSettings {
            enabled: true,
            ..CacheSettings::default()
        };
        assert_eq!(CacheConfig::from_settings(Some(&settings)), CacheConfig::default());
    }

    #[test]
    fn cache_fine_grained_flags() {
        let settings = CacheSettings {
            enabled: true,
            cache_system_prompt: true,
            cache_project_memory: false,
        };
        let cache = CacheConfig::from_settings(Some(&settings));

        assert!(cache.hint_system_prompt());
        assert!(!cache.hint_project_memory());
    }

    #[test]
    fn global_gate_wins_over_block_flag() {
        let cache = CacheConfig {
            enabled: false,
            system_prompt: true,
            project_memory: true,
        };
        assert!(!cache.hint_system_prompt());
        assert!(!cache.hint_project_memory());
    }
}

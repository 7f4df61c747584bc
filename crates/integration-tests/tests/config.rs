//! Configuration file to effective provider settings

mod harness;

use indoc::indoc;
use parley_config::{CacheConfig, Config, LogFormat, ProviderConfig};
use parley_llm::provider::{bedrock, gemini, grok};

#[test]
fn file_overrides_merge_with_builtin_defaults() {
    let toml = indoc! {r#"
        [ai]
        enabled = true
        default_provider = "grok"

        [ai.providers.grok]
        model = "grok-3"

        [ai.providers.bedrock]
        base_url = "eu-west-1"
        max_tokens = 2048

        [telemetry]
        log_filter = "parley_llm=debug"
        format = "json"
    "#};

    let config = Config::from_toml_str(toml).unwrap();
    assert_eq!(config.ai.default_provider.as_deref(), Some("grok"));
    assert_eq!(config.telemetry.format, LogFormat::Json);

    let grok = ProviderConfig::resolve(&config.ai, grok::PROVIDER_NAME, &grok::defaults());
    assert!(grok.enabled);
    assert_eq!(grok.model, "grok-3");
    assert_eq!(grok.api_key_env, "XAI_API_KEY");
    assert_eq!(grok.base_url, "https://api.x.ai/v1");

    let bedrock = ProviderConfig::resolve(&config.ai, bedrock::PROVIDER_NAME, &bedrock::defaults());
    assert_eq!(bedrock.model, "anthropic.claude-sonnet-4-20250514-v2:0");
    assert_eq!(bedrock::region(&bedrock), "eu-west-1");
    assert_eq!(bedrock.max_tokens, 2048);
}

#[test]
fn env_placeholders_expand_before_parsing() {
    let toml = indoc! {r#"
        [ai]
        enabled = true

        [ai.providers.gemini]
        model = "{{ env.PARLEY_IT_GEMINI_MODEL }}"
        base_url = "{{ env.PARLEY_IT_GEMINI_URL | default("https://gemini.internal/v1beta") }}"
    "#};

    temp_env::with_vars(
        [("PARLEY_IT_GEMINI_MODEL", Some("gemini-1.5-pro")), ("PARLEY_IT_GEMINI_URL", None)],
        || {
            let config = harness::config::resolve(toml, gemini::PROVIDER_NAME);

            assert_eq!(config.model, "gemini-1.5-pro");
            assert_eq!(config.base_url, "https://gemini.internal/v1beta");
            assert_eq!(config.max_tokens, 8192);
            assert_eq!(config.cache, CacheConfig::default());
        },
    );
}

#[test]
fn disabled_ai_refuses_every_builtin() {
    let config = Config::default();

    for name in ["anthropic", "azureopenai", "gemini", "grok", "ollama", "openai"] {
        let defaults = parley_llm::builtin_defaults(name).unwrap();
        let resolved = ProviderConfig::resolve(&config.ai, name, &defaults);
        assert!(!resolved.enabled, "{name} should be disabled");
    }

    let resolved = ProviderConfig::resolve(&config.ai, gemini::PROVIDER_NAME, &gemini::defaults());
    let err = gemini::new_client(&resolved).unwrap_err();
    assert_eq!(err.to_string(), "AI features are disabled for provider gemini");
}

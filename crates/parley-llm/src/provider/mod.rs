//! Backend clients and the provider registry
//!
//! Every client is an [`AdapterClient`]: a pure adapter that encodes and
//! decodes, plus a [`Transport`] that moves bytes.

pub mod anthropic;
pub mod azureopenai;
pub mod bedrock;
pub mod gemini;
pub mod grok;
pub mod ollama;
pub mod openai;
pub mod registry;
pub mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use parley_config::{ProviderConfig, ProviderDefaults};
use secrecy::SecretString;
use url::Url;

pub use registry::{ProviderFactory, ProviderRegistry};
pub use transport::{Auth, BedrockTransport, HttpTransport, Transport};

use crate::convert::Adapter;
use crate::error::LlmError;
use crate::types::{Conversation, Message, RequestContext, Response, Tool};

/// Uniform contract every backend client fulfils
#[async_trait]
pub trait Client: Send + Sync {
    /// Provider name
    fn provider(&self) -> &str;

    /// Configured model identifier
    fn model(&self) -> &str;

    /// Configured output token cap
    fn max_tokens(&self) -> u32;

    /// Send a full conversation and decode the answer
    async fn complete(&self, ctx: &RequestContext, conversation: &Conversation<'_>) -> Result<Response, LlmError>;

    /// Send a single user message and return the text reply
    async fn send_message(&self, ctx: &RequestContext, text: &str) -> Result<String, LlmError> {
        let messages = [Message::user(text)];
        let response = self.complete(ctx, &Conversation::new(&messages)).await?;
        Ok(response.content)
    }

    /// Send a single user message with tools available
    async fn send_message_with_tools(
        &self,
        ctx: &RequestContext,
        text: &str,
        tools: &[Arc<dyn Tool>],
    ) -> Result<Response, LlmError> {
        let messages = [Message::user(text)];
        self.complete(ctx, &Conversation::new(&messages).with_tools(tools)).await
    }

    /// Send a conversation history and return the text reply
    async fn send_message_with_history(&self, ctx: &RequestContext, messages: &[Message]) -> Result<String, LlmError> {
        let response = self.complete(ctx, &Conversation::new(messages)).await?;
        Ok(response.content)
    }

    /// Send a conversation history with tools available
    async fn send_message_with_tools_and_history(
        &self,
        ctx: &RequestContext,
        messages: &[Message],
        tools: &[Arc<dyn Tool>],
    ) -> Result<Response, LlmError> {
        self.complete(ctx, &Conversation::new(messages).with_tools(tools)).await
    }

    /// Send a conversation with a system prompt, project memory and tools
    async fn send_message_with_system_prompt_and_tools(
        &self,
        ctx: &RequestContext,
        system_prompt: &str,
        memory: &str,
        messages: &[Message],
        tools: &[Arc<dyn Tool>],
    ) -> Result<Response, LlmError> {
        let conversation = Conversation::new(messages)
            .with_system(system_prompt, memory)
            .with_tools(tools);
        self.complete(ctx, &conversation).await
    }
}

/// Client built from an adapter and a transport
pub struct AdapterClient<A> {
    adapter: A,
    transport: Box<dyn Transport>,
    model: String,
    max_tokens: u32,
}

impl<A: Adapter> AdapterClient<A> {
    /// Combine an adapter with a transport for the configured model
    pub fn new(adapter: A, transport: impl Transport + 'static, config: &ProviderConfig) -> Self {
        Self {
            adapter,
            transport: Box::new(transport),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Adapter used for encoding and decoding
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }
}

impl<A> std::fmt::Debug for AdapterClient<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterClient")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<A: Adapter + 'static> Client for AdapterClient<A> {
    fn provider(&self) -> &str {
        self.adapter.provider()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    async fn complete(&self, ctx: &RequestContext, conversation: &Conversation<'_>) -> Result<Response, LlmError> {
        let provider = self.adapter.provider();
        let messages = conversation.messages.len();
        let tools = conversation.tools.len();

        let body = serde_json::to_vec(&self.adapter.encode(conversation)).map_err(|e| LlmError::encoding(provider, e))?;

        tracing::debug!(provider, model = %self.model, messages, tools, "sending request");

        let raw = self.transport.send(ctx, body).await.map_err(|cause| {
            tracing::error!(provider, model = %self.model, error = %cause, "backend request failed");
            LlmError::SendFailed {
                provider: provider.to_owned(),
                model: self.model.clone(),
                messages,
                tools,
                cause,
            }
        })?;

        let wire: A::Response = serde_json::from_slice(&raw)
            .map_err(|e| LlmError::decoding(provider, format!("failed to unmarshal response: {e}")))?;

        let response = self.adapter.decode(wire)?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                provider,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                cache_read_tokens = usage.cache_read_tokens,
                "received response"
            );
        }

        Ok(response)
    }
}

/// Fail with [`LlmError::Disabled`] unless AI features are on
pub fn ensure_enabled(provider: &str, config: &ProviderConfig) -> Result<(), LlmError> {
    if config.enabled {
        Ok(())
    } else {
        Err(LlmError::Disabled {
            provider: provider.to_owned(),
        })
    }
}

/// Read the API key from the environment variable named in the config
pub fn resolve_api_key(provider: &str, config: &ProviderConfig) -> Result<SecretString, LlmError> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| LlmError::CredentialMissing {
            provider: provider.to_owned(),
            env_var: config.api_key_env.clone(),
        })
}

/// Join the configured (or default) base URL with an endpoint path
pub fn endpoint(provider: &str, base_url: &str, default_base_url: &str, path: &str) -> Result<Url, LlmError> {
    let base = if base_url.is_empty() { default_base_url } else { base_url };
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));

    Url::parse(&joined).map_err(|e| LlmError::InvalidConfig {
        provider: provider.to_owned(),
        reason: format!("invalid base URL {base}: {e}"),
    })
}

/// Registry holding every built-in provider
pub fn builtin_registry() -> ProviderRegistry {
    let registry = ProviderRegistry::new();

    anthropic::register(&registry);
    azureopenai::register(&registry);
    bedrock::register(&registry);
    gemini::register(&registry);
    grok::register(&registry);
    ollama::register(&registry);
    openai::register(&registry);

    registry
}

/// Defaults shipped by a built-in provider
pub fn builtin_defaults(provider: &str) -> Option<ProviderDefaults> {
    match provider {
        anthropic::PROVIDER_NAME => Some(anthropic::defaults()),
        azureopenai::PROVIDER_NAME => Some(azureopenai::defaults()),
        bedrock::PROVIDER_NAME => Some(bedrock::defaults()),
        gemini::PROVIDER_NAME => Some(gemini::defaults()),
        grok::PROVIDER_NAME => Some(grok::defaults()),
        ollama::PROVIDER_NAME => Some(ollama::defaults()),
        openai::PROVIDER_NAME => Some(openai::defaults()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use parley_config::CacheConfig;
    use serde_json::{Value, json};

    use super::*;
    use crate::convert::openai::{Compatible, OpenAiAdapter};
    use crate::convert::tests::StubTool;
    use crate::error::TransportError;
    use crate::types::StopReason;

    /// Transport answering with a canned body and recording what it was sent
    pub(crate) struct StubTransport {
        reply: Result<Vec<u8>, u16>,
        pub sent: Arc<Mutex<Vec<Value>>>,
    }

    impl StubTransport {
        pub(crate) fn replying(body: &Value) -> Self {
            Self {
                reply: Ok(serde_json::to_vec(body).unwrap()),
                sent: Arc::default(),
            }
        }

        pub(crate) fn raw(body: &[u8]) -> Self {
            Self {
                reply: Ok(body.to_vec()),
                sent: Arc::default(),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                sent: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, _ctx: &RequestContext, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
            self.sent.lock().unwrap().push(serde_json::from_slice(&body).unwrap());
            match &self.reply {
                Ok(body) => Ok(body.clone()),
                Err(status) => Err(TransportError::Status {
                    status: *status,
                    body: "upstream unavailable".to_owned(),
                }),
            }
        }
    }

    pub(crate) fn config(model: &str) -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: model.to_owned(),
            api_key_env: "PARLEY_TEST_KEY".to_owned(),
            max_tokens: 1024,
            base_url: String::new(),
            cache: CacheConfig::default(),
        }
    }

    fn client(transport: StubTransport) -> AdapterClient<OpenAiAdapter> {
        let config = config("gpt-4o");
        AdapterClient::new(
            OpenAiAdapter::new(Compatible::new("openai"), &config.model, config.max_tokens),
            transport,
            &config,
        )
    }

    fn text_reply(text: &str) -> Value {
        json!({"choices": [{"message": {"role": "assistant", "content": text}, "finish_reason": "stop"}]})
    }

    #[tokio::test]
    async fn send_message_returns_text() {
        let transport = StubTransport::replying(&text_reply("dev, staging, prod"));
        let sent = Arc::clone(&transport.sent);
        let client = client(transport);

        let reply = client.send_message(&RequestContext::empty(), "List stacks").await.unwrap();

        assert_eq!(reply, "dev, staging, prod");
        assert_eq!(client.model(), "gpt-4o");
        assert_eq!(client.max_tokens(), 1024);
        assert_eq!(sent.lock().unwrap()[0]["messages"], json!([{"role": "user", "content": "List stacks"}]));
    }

    #[tokio::test]
    async fn system_prompt_memory_and_tools_are_sent() {
        let transport = StubTransport::replying(&text_reply("ok"));
        let sent = Arc::clone(&transport.sent);
        let client = client(transport);
        let tools = [StubTool::shared("list_stacks", Vec::new())];
        let history = [Message::user("hi")];

        let response = client
            .send_message_with_system_prompt_and_tools(&RequestContext::empty(), "prompt", "memory", &history, &tools)
            .await
            .unwrap();

        assert_eq!(response.stop_reason, StopReason::EndTurn);
        let body = &sent.lock().unwrap()[0];
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["tools"][0]["function"]["name"], "list_stacks");
    }

    #[tokio::test]
    async fn transport_failure_carries_context() {
        let client = client(StubTransport::failing(503));
        let history = [Message::user("a"), Message::assistant("b"), Message::user("c")];

        let err = client
            .send_message_with_history(&RequestContext::empty(), &history)
            .await
            .unwrap_err();

        match &err {
            LlmError::SendFailed {
                provider,
                model,
                messages,
                tools,
                ..
            } => {
                assert_eq!(provider, "openai");
                assert_eq!(model, "gpt-4o");
                assert_eq!(*messages, 3);
                assert_eq!(*tools, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn malformed_body_is_decoding_error() {
        let client = client(StubTransport::raw(b"<html>gateway timeout</html>"));

        let err = client.send_message(&RequestContext::empty(), "hi").await.unwrap_err();

        assert!(matches!(err, LlmError::ResponseDecoding { .. }));
        assert!(err.to_string().contains("failed to unmarshal"));
    }

    #[tokio::test]
    async fn null_fields_from_compatible_server() {
        let body = br#"{"id":null,"choices":[{"message":{"role":"assistant","content":"hi","tool_calls":null},"finish_reason":"stop"}],"usage":null}"#;
        let client = client(StubTransport::raw(body));

        let reply = client.send_message(&RequestContext::empty(), "hi").await.unwrap();

        assert_eq!(reply, "hi");
    }

    #[test]
    fn disabled_config_is_rejected() {
        let mut config = config("gpt-4o");
        config.enabled = false;

        let err = ensure_enabled("openai", &config).unwrap_err();
        assert!(err.to_string().contains("AI features are disabled"));
    }

    #[test]
    fn api_key_from_environment() {
        use secrecy::ExposeSecret;

        temp_env::with_var("PARLEY_TEST_KEY", Some("sk-test"), || {
            let key = resolve_api_key("openai", &config("gpt-4o")).unwrap();
            assert_eq!(key.expose_secret(), "sk-test");
        });

        temp_env::with_var("PARLEY_TEST_KEY", Some(""), || {
            let err = resolve_api_key("openai", &config("gpt-4o")).unwrap_err();
            assert!(err.to_string().contains("API key not found"));
        });
    }

    #[test]
    fn endpoint_joins_paths() {
        let url = endpoint("openai", "", "https://api.openai.com/v1", "chat/completions").unwrap();
        assert_eq!(url.as_str(), "https://api.openai.com/v1/chat/completions");

        let url = endpoint("openai", "http://localhost:8080/v1/", "https://unused", "/chat/completions").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/chat/completions");

        assert!(matches!(
            endpoint("openai", "not a url", "https://unused", "chat/completions"),
            Err(LlmError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn builtin_registry_has_every_provider() {
        let registry = builtin_registry();

        assert_eq!(registry.provider_count(), 7);
        assert_eq!(
            registry.list_providers(),
            "anthropic, azureopenai, bedrock, gemini, grok, ollama, openai"
        );
        assert!(builtin_defaults("grok").is_some());
        assert!(builtin_defaults("mistral").is_none());
    }
}

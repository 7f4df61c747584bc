//! Conversion between canonical types and the Anthropic Messages format
//!
//! The hosted API and the managed-hosting backend share the content-block
//! shape; they differ in where the model and version live and in caching.

use parley_config::CacheConfig;

use super::{Adapter, ToolSchema, input_object, resolve_stop_reason};
use crate::error::LlmError;
use crate::protocol::anthropic::{
    AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse, AnthropicSystemBlock, AnthropicTool,
};
use crate::types::{Conversation, Response, Role, StopReason, Tool, ToolCall, Usage};

/// `anthropic_version` required in managed-hosting request bodies
pub const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// The Messages API has no system turn; system turns are sent as user turns
const fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "assistant",
        Role::User | Role::System => "user",
    }
}

fn stop_reason(stop_reason: Option<&str>) -> StopReason {
    match stop_reason {
        Some("tool_use") => StopReason::ToolUse,
        Some("max_tokens") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    }
}

fn encode_tool(tool: &dyn Tool) -> AnthropicTool {
    AnthropicTool {
        name: tool.name().to_owned(),
        description: tool.description().to_owned(),
        input_schema: ToolSchema::from_parameters(&tool.parameters()).into_object_schema("object"),
    }
}

/// System blocks for the prompt and memory, hinted per `cache` when given
fn system_blocks(conversation: &Conversation<'_>, cache: Option<&CacheConfig>) -> Vec<AnthropicSystemBlock> {
    let prompt_hint = cache.is_some_and(CacheConfig::hint_system_prompt);
    let memory_hint = cache.is_some_and(CacheConfig::hint_project_memory);

    [
        (conversation.system_prompt, prompt_hint),
        (conversation.memory, memory_hint),
    ]
    .into_iter()
    .filter(|(text, _)| !text.is_empty())
    .map(|(text, cached)| AnthropicSystemBlock::text(text, cached))
    .collect()
}

fn encode_request(conversation: &Conversation<'_>, max_tokens: u32, cache: Option<&CacheConfig>) -> AnthropicRequest {
    AnthropicRequest {
        model: None,
        anthropic_version: None,
        max_tokens,
        system: system_blocks(conversation, cache),
        messages: conversation
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: wire_role(m.role).to_owned(),
                content: m.content.clone(),
            })
            .collect(),
        tools: conversation.tools.iter().map(|t| encode_tool(t.as_ref())).collect(),
    }
}

fn decode_response(provider: &str, response: AnthropicResponse) -> Result<Response, LlmError> {
    let mut content = String::new();
    let mut tool_calls = Vec::new();

    for block in response.content {
        match block {
            AnthropicContentBlock::Text { text } => content.push_str(&text),
            AnthropicContentBlock::ToolUse { id, name, input } => {
                let input = input_object(provider, &name, input)?;
                tool_calls.push(ToolCall { id, name, input });
            }
            AnthropicContentBlock::Other => {}
        }
    }

    let usage = response.usage.and_then(|u| {
        Usage::from_counts(
            u.input_tokens,
            u.output_tokens,
            0,
            u.cache_read_input_tokens,
            u.cache_creation_input_tokens,
        )
    });

    Ok(Response {
        content,
        stop_reason: resolve_stop_reason(stop_reason(response.stop_reason.as_deref()), !tool_calls.is_empty()),
        tool_calls,
        usage,
    })
}

/// Adapter for the hosted Messages API
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    provider: String,
    model: String,
    max_tokens: u32,
    cache: CacheConfig,
}

impl AnthropicAdapter {
    /// Adapter for one model, output cap and caching preference
    pub fn new(provider: impl Into<String>, model: impl Into<String>, max_tokens: u32, cache: CacheConfig) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            max_tokens,
            cache,
        }
    }
}

impl Adapter for AnthropicAdapter {
    type Request = AnthropicRequest;
    type Response = AnthropicResponse;

    fn provider(&self) -> &str {
        &self.provider
    }

    fn encode(&self, conversation: &Conversation<'_>) -> AnthropicRequest {
        AnthropicRequest {
            model: Some(self.model.clone()),
            ..encode_request(conversation, self.max_tokens, Some(&self.cache))
        }
    }

    fn decode(&self, response: AnthropicResponse) -> Result<Response, LlmError> {
        decode_response(&self.provider, response)
    }
}

/// Adapter for Anthropic models on the managed-hosting backend
///
/// The model travels in the invocation URL, so the body has no `model`.
/// No caching hints are sent.
#[derive(Debug, Clone)]
pub struct BedrockAdapter {
    provider: String,
    max_tokens: u32,
}

impl BedrockAdapter {
    /// Adapter for one output cap
    pub fn new(provider: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider: provider.into(),
            max_tokens,
        }
    }
}

impl Adapter for BedrockAdapter {
    type Request = AnthropicRequest;
    type Response = AnthropicResponse;

    fn provider(&self) -> &str {
        &self.provider
    }

    fn encode(&self, conversation: &Conversation<'_>) -> AnthropicRequest {
        AnthropicRequest {
            anthropic_version: Some(BEDROCK_ANTHROPIC_VERSION.to_owned()),
            ..encode_request(conversation, self.max_tokens, None)
        }
    }

    fn decode(&self, response: AnthropicResponse) -> Result<Response, LlmError> {
        decode_response(&self.provider, response)
    }
}

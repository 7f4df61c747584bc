//! Conversion between canonical types and the `OpenAI` chat-completion format
//!
//! Every backend speaking this wire shape shares one adapter, parameterised by
//! a small [`Dialect`].

use super::{Adapter, ToolSchema, parse_tool_arguments, resolve_stop_reason};
use crate::error::LlmError;
use crate::protocol::openai::{OpenAiFunction, OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiTool};
use crate::types::{Conversation, Response, Role, StopReason, Tool, ToolCall, Usage};

/// Models whose output cap must be sent as `max_completion_tokens`
const MAX_COMPLETION_TOKENS_MODELS: &[&str] = &["o1-preview", "o1-mini", "chatgpt-4o-latest"];

/// Model family prefix that requires `max_completion_tokens`
const MAX_COMPLETION_TOKENS_PREFIX: &str = "gpt-5";

/// Whether a model takes its output cap as `max_completion_tokens`
pub fn requires_max_completion_tokens(model: &str) -> bool {
    model.starts_with(MAX_COMPLETION_TOKENS_PREFIX) || MAX_COMPLETION_TOKENS_MODELS.contains(&model)
}

/// Output cap in the field a given model accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimit {
    /// Legacy `max_tokens`
    MaxTokens(u32),
    /// Newer `max_completion_tokens`
    MaxCompletionTokens(u32),
}

impl TokenLimit {
    /// Select the field for `model`
    pub fn for_model(model: &str, max_tokens: u32) -> Self {
        if requires_max_completion_tokens(model) {
            Self::MaxCompletionTokens(max_tokens)
        } else {
            Self::MaxTokens(max_tokens)
        }
    }

    /// Write the limit into a request, clearing the other field
    pub fn apply(self, request: &mut OpenAiRequest) {
        match self {
            Self::MaxTokens(limit) => {
                request.max_tokens = Some(limit);
                request.max_completion_tokens = None;
            }
            Self::MaxCompletionTokens(limit) => {
                request.max_tokens = None;
                request.max_completion_tokens = Some(limit);
            }
        }
    }
}

/// Per-backend vocabulary of an `OpenAI`-compatible API
pub trait Dialect: Send + Sync {
    /// Provider name
    fn provider(&self) -> &str;

    /// Wire name of a canonical role
    fn role(&self, role: Role) -> &'static str {
        role.as_str()
    }

    /// Canonical stop reason for a `finish_reason` value
    fn stop_reason(&self, finish_reason: &str) -> StopReason {
        match finish_reason {
            "tool_calls" | "function_call" => StopReason::ToolUse,
            "length" => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        }
    }
}

/// Dialect shared by `OpenAI` and the backends that mirror it exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compatible {
    provider: &'static str,
}

impl Compatible {
    /// Dialect reporting errors under `provider`
    pub const fn new(provider: &'static str) -> Self {
        Self { provider }
    }
}

impl Dialect for Compatible {
    fn provider(&self) -> &str {
        self.provider
    }
}

/// Adapter for the `OpenAI` chat-completion wire format
#[derive(Debug, Clone)]
pub struct OpenAiAdapter<D = Compatible> {
    dialect: D,
    model: String,
    max_tokens: u32,
}

impl<D: Dialect> OpenAiAdapter<D> {
    /// Adapter for one model and output cap
    pub fn new(dialect: D, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            dialect,
            model: model.into(),
            max_tokens,
        }
    }

    fn message(&self, role: Role, content: &str) -> OpenAiMessage {
        OpenAiMessage {
            role: self.dialect.role(role).to_owned(),
            content: content.to_owned(),
        }
    }
}

fn encode_tool(tool: &dyn Tool) -> OpenAiTool {
    OpenAiTool {
        tool_type: "function".to_owned(),
        function: OpenAiFunction {
            name: tool.name().to_owned(),
            description: tool.description().to_owned(),
            parameters: ToolSchema::from_parameters(&tool.parameters()).into_object_schema("object"),
        },
    }
}

impl<D: Dialect> Adapter for OpenAiAdapter<D> {
    type Request = OpenAiRequest;
    type Response = OpenAiResponse;

    fn provider(&self) -> &str {
        self.dialect.provider()
    }

    fn encode(&self, conversation: &Conversation<'_>) -> OpenAiRequest {
        let preamble = [conversation.system_prompt, conversation.memory]
            .into_iter()
            .filter(|text| !text.is_empty())
            .map(|text| self.message(Role::System, text));

        let messages = preamble
            .chain(conversation.messages.iter().map(|m| self.message(m.role, &m.content)))
            .collect();

        let mut request = OpenAiRequest {
            model: self.model.clone(),
            messages,
            max_tokens: None,
            max_completion_tokens: None,
            tools: conversation.tools.iter().map(|t| encode_tool(t.as_ref())).collect(),
        };
        TokenLimit::for_model(&self.model, self.max_tokens).apply(&mut request);

        request
    }

    fn decode(&self, response: OpenAiResponse) -> Result<Response, LlmError> {
        let provider = self.dialect.provider();

        let Some(choice) = response.choices.into_iter().next() else {
            return Err(LlmError::NoResponseContent {
                provider: provider.to_owned(),
            });
        };

        let tool_calls = choice
            .message
            .tool_calls
            .into_iter()
            .map(|call| {
                Ok(ToolCall {
                    input: parse_tool_arguments(provider, &call.function.name, &call.function.arguments)?,
                    id: call.id,
                    name: call.function.name,
                })
            })
            .collect::<Result<Vec<_>, LlmError>>()?;

        let reported = choice
            .finish_reason
            .as_deref()
            .map_or(StopReason::EndTurn, |reason| self.dialect.stop_reason(reason));

        let usage = response.usage.and_then(|u| {
            let cached = u.prompt_tokens_details.map_or(0, |d| d.cached_tokens);
            Usage::from_counts(u.prompt_tokens, u.completion_tokens, u.total_tokens, cached, 0)
        });

        Ok(Response {
            content: choice.message.content.unwrap_or_default(),
            stop_reason: resolve_stop_reason(reported, !tool_calls.is_empty()),
            tool_calls,
            usage,
        })
    }
}

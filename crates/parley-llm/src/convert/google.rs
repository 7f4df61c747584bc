//! Conversion between canonical types and the Google `generateContent` format

use super::{Adapter, ToolSchema, input_object, resolve_stop_reason};
use crate::error::LlmError;
use crate::protocol::google::{
    GoogleContent, GoogleFunctionDeclaration, GoogleGenerationConfig, GooglePart, GoogleRequest, GoogleResponse,
    GoogleTool,
};
use crate::types::{Conversation, ParamType, Response, Role, StopReason, Tool, ToolCall, Usage};

/// `generateContent` knows only `user` and `model`; system turns become user turns
const fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::User | Role::System => "user",
    }
}

/// Upper-case schema type names used inside function declarations
const fn schema_type(param_type: ParamType) -> &'static str {
    match param_type {
        ParamType::String => "STRING",
        ParamType::Integer => "INTEGER",
        ParamType::Boolean => "BOOLEAN",
        ParamType::Array => "ARRAY",
        ParamType::Object => "OBJECT",
        ParamType::Number => "NUMBER",
    }
}

fn stop_reason(finish_reason: Option<&str>) -> StopReason {
    match finish_reason {
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        // STOP, SAFETY, RECITATION, OTHER and anything newer
        _ => StopReason::EndTurn,
    }
}

fn encode_declaration(tool: &dyn Tool) -> GoogleFunctionDeclaration {
    GoogleFunctionDeclaration {
        name: tool.name().to_owned(),
        description: tool.description().to_owned(),
        parameters: ToolSchema::with_type_names(&tool.parameters(), schema_type).into_object_schema("OBJECT"),
    }
}

/// Adapter for the Gemini `generateContent` API
///
/// The model travels in the request URL, so the body has no model field.
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    provider: String,
    max_tokens: u32,
}

impl GeminiAdapter {
    /// Adapter for one output cap
    pub fn new(provider: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider: provider.into(),
            max_tokens,
        }
    }
}

impl Adapter for GeminiAdapter {
    type Request = GoogleRequest;
    type Response = GoogleResponse;

    fn provider(&self) -> &str {
        &self.provider
    }

    fn encode(&self, conversation: &Conversation<'_>) -> GoogleRequest {
        let system_parts: Vec<_> = [conversation.system_prompt, conversation.memory]
            .into_iter()
            .filter(|text| !text.is_empty())
            .map(|text| GooglePart {
                text: Some(text.to_owned()),
                ..GooglePart::default()
            })
            .collect();

        let system_instruction = (!system_parts.is_empty()).then(|| GoogleContent {
            role: None,
            parts: system_parts,
        });

        let contents = conversation
            .messages
            .iter()
            .map(|m| GoogleContent::text(Some(wire_role(m.role)), m.content.as_str()))
            .collect();

        let tools = if conversation.tools.is_empty() {
            Vec::new()
        } else {
            vec![GoogleTool {
                function_declarations: conversation.tools.iter().map(|t| encode_declaration(t.as_ref())).collect(),
            }]
        };

        GoogleRequest {
            contents,
            system_instruction,
            generation_config: Some(GoogleGenerationConfig {
                max_output_tokens: Some(self.max_tokens),
            }),
            tools,
        }
    }

    fn decode(&self, response: GoogleResponse) -> Result<Response, LlmError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            return Err(LlmError::NoResponseContent {
                provider: self.provider.clone(),
            });
        };

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(text) = part.text {
                content.push_str(&text);
            }
            if let Some(call) = part.function_call {
                let input = input_object(&self.provider, &call.name, call.args)?;
                tool_calls.push(ToolCall {
                    id: call.id.unwrap_or_else(|| format!("call_{}", call.name)),
                    name: call.name,
                    input,
                });
            }
        }

        let usage = response.usage_metadata.and_then(|u| {
            Usage::from_counts(
                u.prompt_token_count,
                u.candidates_token_count,
                u.total_token_count,
                u.cached_content_token_count,
                0,
            )
        });

        Ok(Response {
            content,
            stop_reason: resolve_stop_reason(stop_reason(candidate.finish_reason.as_deref()), !tool_calls.is_empty()),
            tool_calls,
            usage,
        })
    }
}

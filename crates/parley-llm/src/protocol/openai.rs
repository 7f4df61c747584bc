//! `OpenAI` chat completion wire format types
//!
//! Shared by every backend that speaks the same chat-completion shape.

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

// -- Request types --

/// Chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<OpenAiMessage>,
    /// Legacy output cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Output cap for newer model families
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    /// Tool definitions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<OpenAiTool>,
}

/// Message within a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiMessage {
    /// Message role
    pub role: String,
    /// Text content
    pub content: String,
}

/// Tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiTool {
    /// Tool type (always "function")
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function specification
    pub function: OpenAiFunction,
}

/// Function specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiFunction {
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the arguments
    pub parameters: serde_json::Value,
}

// -- Response types --

/// Chat completion response
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiResponse {
    /// Response identifier
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    /// Model that produced the response
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub model: String,
    /// Generated choices
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub choices: Vec<OpenAiChoice>,
    /// Token usage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<OpenAiUsage>,
}

/// A single completion choice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiChoice {
    /// Index of this choice
    #[serde(default)]
    pub index: u32,
    /// Generated message
    pub message: OpenAiChoiceMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message within a response choice
///
/// Compatible servers send `null` for absent fields as often as they omit them.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiChoiceMessage {
    /// Role (always "assistant")
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub role: String,
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool calls requested by the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub tool_calls: Vec<OpenAiToolCall>,
}

/// Tool call requested by the model
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiToolCall {
    /// Call identifier (some compatible servers omit it)
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub id: String,
    /// Call type (always "function")
    #[serde(rename = "type", default = "function_type")]
    pub tool_type: String,
    /// Function name and raw JSON arguments
    pub function: OpenAiFunctionCall,
}

/// Function name and raw JSON arguments
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiFunctionCall {
    /// Function name
    pub name: String,
    /// Arguments as a JSON string
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub arguments: String,
}

/// Token usage
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiUsage {
    /// Prompt tokens
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub prompt_tokens: i64,
    /// Completion tokens
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub completion_tokens: i64,
    /// Total tokens
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub total_tokens: i64,
    /// Prompt breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<OpenAiPromptTokensDetails>,
}

/// Prompt token breakdown
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiPromptTokensDetails {
    /// Prompt tokens served from the backend cache
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub cached_tokens: i64,
}

fn function_type() -> String {
    "function".to_owned()
}

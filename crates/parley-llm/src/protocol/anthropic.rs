//! Anthropic Messages API wire format types
//!
//! The same request shape is sent to the managed-hosting backend, which
//! takes the model from the URL and requires `anthropic_version` in the body.

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

// -- Request types --

/// Messages API request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicRequest {
    /// Model identifier (absent for managed hosting)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// API version carried in the body (managed hosting only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// System text blocks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system: Vec<AnthropicSystemBlock>,
    /// Conversation turns
    pub messages: Vec<AnthropicMessage>,
    /// Tool definitions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AnthropicTool>,
}

/// System text block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicSystemBlock {
    /// Block type (always "text")
    #[serde(rename = "type")]
    pub block_type: String,
    /// Block text
    pub text: String,
    /// Prompt caching hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<AnthropicCacheControl>,
}

impl AnthropicSystemBlock {
    /// Text block with an optional ephemeral caching hint
    pub fn text(text: impl Into<String>, cached: bool) -> Self {
        Self {
            block_type: "text".to_owned(),
            text: text.into(),
            cache_control: cached.then(AnthropicCacheControl::ephemeral),
        }
    }
}

/// Prompt caching hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicCacheControl {
    /// Cache type
    #[serde(rename = "type")]
    pub control_type: String,
}

impl AnthropicCacheControl {
    /// Short-lived server-side cache
    pub fn ephemeral() -> Self {
        Self {
            control_type: "ephemeral".to_owned(),
        }
    }
}

/// Conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role ("user" or "assistant")
    pub role: String,
    /// Text content
    pub content: String,
}

/// Tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicTool {
    /// Tool name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the input
    pub input_schema: serde_json::Value,
}

// -- Response types --

/// Messages API response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnthropicResponse {
    /// Response identifier
    #[serde(default)]
    pub id: String,
    /// Model that produced the response
    #[serde(default)]
    pub model: String,
    /// Content blocks
    #[serde(default)]
    pub content: Vec<AnthropicContentBlock>,
    /// Why generation stopped
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<AnthropicUsage>,
}

/// Content block in a response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlock {
    /// Text output
    Text {
        /// The text string
        text: String,
    },
    /// Tool invocation
    ToolUse {
        /// Tool use identifier
        id: String,
        /// Tool name
        name: String,
        /// Tool input as JSON
        #[serde(default)]
        input: serde_json::Value,
    },
    /// Any block kind this layer does not consume (thinking, citations, ...)
    #[serde(other)]
    Other,
}

/// Token usage
///
/// The cache counters are documented as nullable; `null` reads as zero.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnthropicUsage {
    /// Prompt tokens not served from cache
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub input_tokens: i64,
    /// Generated tokens
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub output_tokens: i64,
    /// Prompt tokens written to the cache
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub cache_creation_input_tokens: i64,
    /// Prompt tokens read from the cache
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub cache_read_input_tokens: i64,
}

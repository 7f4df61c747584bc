//! Google Generative Language API wire format types

use serde::{Deserialize, Serialize};

// -- Request types --

/// `generateContent` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleRequest {
    /// Conversation contents
    pub contents: Vec<GoogleContent>,
    /// System instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GoogleContent>,
    /// Generation configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GoogleGenerationConfig>,
    /// Tool definitions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<GoogleTool>,
}

/// Content object holding a role and its parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoogleContent {
    /// Role ("user" or "model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts
    #[serde(default)]
    pub parts: Vec<GooglePart>,
}

impl GoogleContent {
    /// Single text part under a role
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_owned),
            parts: vec![GooglePart {
                text: Some(text.into()),
                ..GooglePart::default()
            }],
        }
    }
}

/// A part within a content object
///
/// Exactly one field is set in practice; unknown part kinds deserialise with
/// every field empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePart {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Function call from the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<GoogleFunctionCall>,
}

/// Function call from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleFunctionCall {
    /// Call identifier (not sent by every model)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name
    pub name: String,
    /// Function arguments as JSON
    #[serde(default)]
    pub args: serde_json::Value,
}

/// Generation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenerationConfig {
    /// Maximum output tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Declaration container; every function lives in one container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleTool {
    /// Function declarations
    pub function_declarations: Vec<GoogleFunctionDeclaration>,
}

/// Function declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleFunctionDeclaration {
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Parameter schema using upper-case type names
    pub parameters: serde_json::Value,
}

// -- Response types --

/// `generateContent` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GoogleCandidate>,
    /// Token usage metadata
    #[serde(default)]
    pub usage_metadata: Option<GoogleUsageMetadata>,
}

/// Generated candidate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCandidate {
    /// Generated content (absent when blocked)
    #[serde(default)]
    pub content: Option<GoogleContent>,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleUsageMetadata {
    /// Prompt token count
    #[serde(default)]
    pub prompt_token_count: i64,
    /// Candidates token count
    #[serde(default)]
    pub candidates_token_count: i64,
    /// Total token count
    #[serde(default)]
    pub total_token_count: i64,
    /// Prompt tokens served from cached content
    #[serde(default)]
    pub cached_content_token_count: i64,
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::request::RequestContext;

/// JSON-Schema primitive type of a tool parameter
///
/// Deserialising an unrecognised type yields [`ParamType::String`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Boolean,
    Array,
    Object,
    Number,
}

impl ParamType {
    /// JSON-Schema type name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Number => "number",
        }
    }
}

impl From<String> for ParamType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for ParamType {
    fn from(value: &str) -> Self {
        match value {
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            "number" => Self::Number,
            _ => Self::String,
        }
    }
}

/// Describes one argument a tool accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Argument name
    pub name: String,
    /// Argument type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Whether the model must supply the argument
    #[serde(default)]
    pub required: bool,
    /// Value used when the argument is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Parameter {
    /// Create an optional parameter
    pub fn new(name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: false,
            default: None,
        }
    }

    /// Mark the parameter as required
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a default value
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Result of running a tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the tool completed its work
    pub success: bool,
    /// Text handed back to the model
    pub output: String,
    /// Failure description when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Structured payload for callers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ToolOutput {
    /// Successful result with text output
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            ..Self::default()
        }
    }

    /// Failed result with an error description
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// An executable capability offered to a model
///
/// Identity is the name: registries and backends refer to tools only by it.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name
    fn name(&self) -> &str;

    /// What the tool does, shown to the model
    fn description(&self) -> &str;

    /// Accepted arguments
    fn parameters(&self) -> Vec<Parameter>;

    /// Whether a human must approve each invocation
    fn requires_permission(&self) -> bool {
        false
    }

    /// Whether the tool touches restricted resources
    fn is_restricted(&self) -> bool {
        false
    }

    /// Run the tool with decoded arguments
    async fn execute(&self, ctx: &RequestContext, args: &Map<String, Value>) -> anyhow::Result<ToolOutput>;
}

/// A backend's request to invoke a named tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned call identifier
    pub id: String,
    /// Name of the tool to run
    pub name: String,
    /// Decoded JSON arguments
    pub input: Map<String, Value>,
}

//! Encoding canonical conversations into wire requests and decoding wire
//! responses back into canonical [`Response`] values
//!
//! Adapters hold only immutable configuration, so one instance may serve
//! concurrent callers without synchronisation.

pub mod anthropic;
pub mod google;
pub mod openai;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::error::LlmError;
use crate::types::{Conversation, ParamType, Parameter, Response, StopReason};

/// Encode/decode pair for one backend wire format
pub trait Adapter: Send + Sync {
    /// Outbound wire payload
    type Request: Serialize + Send + Sync;
    /// Inbound wire payload
    type Response: DeserializeOwned + Send;

    /// Provider name used in error context
    fn provider(&self) -> &str;

    /// Build the backend request for a conversation
    fn encode(&self, conversation: &Conversation<'_>) -> Self::Request;

    /// Turn a backend response into a canonical response
    fn decode(&self, response: Self::Response) -> Result<Response, LlmError>;
}

/// `properties` and `required` halves of a tool's argument schema
///
/// Backends wrap the pair in different envelopes; building it is shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSchema {
    /// Argument name to `{type, description}`
    pub properties: Map<String, Value>,
    /// Names of arguments the model must supply
    pub required: Vec<String>,
}

impl ToolSchema {
    /// Schema using JSON-Schema type names
    pub fn from_parameters(parameters: &[Parameter]) -> Self {
        Self::with_type_names(parameters, ParamType::as_str)
    }

    /// Schema using a backend-specific spelling of each type
    pub fn with_type_names(parameters: &[Parameter], type_name: impl Fn(ParamType) -> &'static str) -> Self {
        let mut schema = Self::default();

        for parameter in parameters {
            schema.properties.insert(
                parameter.name.clone(),
                json!({
                    "type": type_name(parameter.param_type),
                    "description": parameter.description,
                }),
            );
            if parameter.required {
                schema.required.push(parameter.name.clone());
            }
        }

        schema
    }

    /// Wrap the pair in an object schema whose type is spelled `object_type`
    pub fn into_object_schema(self, object_type: &str) -> Value {
        json!({
            "type": object_type,
            "properties": self.properties,
            "required": self.required,
        })
    }
}

/// Final stop reason given the backend's signal and the decoded tool calls
///
/// Tool calls take priority over whatever the backend reported.
pub const fn resolve_stop_reason(reported: StopReason, has_tool_calls: bool) -> StopReason {
    if has_tool_calls { StopReason::ToolUse } else { reported }
}

/// Decode a JSON argument string into an object
///
/// An empty string is an empty object. Anything that is not a JSON object
/// fails the whole decode.
pub fn parse_tool_arguments(provider: &str, tool: &str, raw: &str) -> Result<Map<String, Value>, LlmError> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| LlmError::decoding(provider, format!("failed to parse tool arguments for {tool}: {e}")))?;

    input_object(provider, tool, value)
}

/// Require an already-decoded JSON value to be an object (`null` is empty)
pub fn input_object(provider: &str, tool: &str, value: Value) -> Result<Map<String, Value>, LlmError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(LlmError::decoding(
            provider,
            format!("failed to parse tool arguments for {tool}: expected an object, got {other}"),
        )),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::types::{RequestContext, Tool, ToolOutput};

    /// Tool with fixed metadata that echoes its arguments
    pub(crate) struct StubTool {
        pub name: String,
        pub description: String,
        pub parameters: Vec<Parameter>,
    }

    impl StubTool {
        pub(crate) fn new(name: &str, parameters: Vec<Parameter>) -> Self {
            Self {
                name: name.to_owned(),
                description: format!("{name} tool"),
                parameters,
            }
        }

        pub(crate) fn shared(name: &str, parameters: Vec<Parameter>) -> Arc<dyn Tool> {
            Arc::new(Self::new(name, parameters))
        }
    }

    #[async_trait]
    impl Tool for StubTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            &self.description
        }

        fn parameters(&self) -> Vec<Parameter> {
            self.parameters.clone()
        }

        async fn execute(&self, _ctx: &RequestContext, args: &Map<String, Value>) -> anyhow::Result<ToolOutput> {
            Ok(ToolOutput::success(Value::Object(args.clone()).to_string()))
        }
    }

    pub(crate) fn describe_stack_parameters() -> Vec<Parameter> {
        vec![
            Parameter::new("component", ParamType::String, "Component name").required(),
            Parameter::new("stack", ParamType::String, "Stack name").required(),
            Parameter::new("depth", ParamType::Integer, "Nesting depth"),
        ]
    }

    #[test]
    fn schema_properties_and_required() {
        let schema = ToolSchema::from_parameters(&describe_stack_parameters());

        assert_eq!(schema.properties["depth"], json!({"type": "integer", "description": "Nesting depth"}));
        assert_eq!(schema.required, ["component", "stack"]);
    }

    #[test]
    fn schema_without_parameters() {
        let schema = ToolSchema::from_parameters(&[]).into_object_schema("object");
        assert_eq!(schema, json!({"type": "object", "properties": {}, "required": []}));
    }

    #[test]
    fn tool_calls_force_tool_use() {
        for reported in [StopReason::EndTurn, StopReason::MaxTokens, StopReason::ToolUse] {
            assert_eq!(resolve_stop_reason(reported, true), StopReason::ToolUse);
        }
        assert_eq!(resolve_stop_reason(StopReason::MaxTokens, false), StopReason::MaxTokens);
    }

    #[test]
    fn empty_arguments_are_an_empty_object() {
        assert!(parse_tool_arguments("openai", "list", "").unwrap().is_empty());
        assert!(parse_tool_arguments("openai", "list", "  ").unwrap().is_empty());
    }

    #[test]
    fn malformed_arguments_fail_closed() {
        let err = parse_tool_arguments("openai", "list", "{not json").unwrap_err();
        assert!(err.to_string().contains("failed to parse tool arguments"));

        let err = parse_tool_arguments("openai", "list", "[1, 2]").unwrap_err();
        assert!(matches!(err, LlmError::ResponseDecoding { .. }));
    }

    #[test]
    fn null_input_is_an_empty_object() {
        assert!(input_object("anthropic", "list", Value::Null).unwrap().is_empty());
    }
}

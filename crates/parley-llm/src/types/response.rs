use serde::{Deserialize, Serialize};

use super::tool::ToolCall;

/// Why generation ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of the turn, also used for unrecognised backend signals
    #[default]
    EndTurn,
    /// The model asked for one or more tool calls
    ToolUse,
    /// Output hit the token cap
    MaxTokens,
}

/// Token accounting for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub input_tokens: i64,
    /// Generated tokens
    pub output_tokens: i64,
    /// Prompt plus generated tokens
    pub total_tokens: i64,
    /// Prompt tokens served from the backend cache
    pub cache_read_tokens: i64,
    /// Prompt tokens written to the backend cache
    pub cache_creation_tokens: i64,
}

impl Usage {
    /// Build usage from backend counters
    ///
    /// Returns `None` when every counter is zero. A zero `total` is replaced
    /// by `input + output`.
    pub fn from_counts(input: i64, output: i64, total: i64, cache_read: i64, cache_creation: i64) -> Option<Self> {
        if input == 0 && output == 0 && total == 0 && cache_read == 0 && cache_creation == 0 {
            return None;
        }

        let total_tokens = if total == 0 { input + output } else { total };

        Some(Self {
            input_tokens: input,
            output_tokens: output,
            total_tokens,
            cache_read_tokens: cache_read,
            cache_creation_tokens: cache_creation,
        })
    }
}

/// Canonical result of one backend call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Concatenated text output
    pub content: String,
    /// Tool invocations requested by the model, in backend order
    pub tool_calls: Vec<ToolCall>,
    /// Why generation ended
    pub stop_reason: StopReason,
    /// Token accounting, absent when the backend reported nothing
    pub usage: Option<Usage>,
}

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::message::Message;
use super::tool::Tool;

/// Borrowed input of every encoder
#[derive(Clone, Copy, Default)]
pub struct Conversation<'a> {
    /// Instructions placed ahead of the conversation
    pub system_prompt: &'a str,
    /// Project memory placed after the system prompt
    pub memory: &'a str,
    /// Ordered turns
    pub messages: &'a [Message],
    /// Tools offered to the model
    pub tools: &'a [Arc<dyn Tool>],
}

impl<'a> Conversation<'a> {
    /// Conversation made only of turns
    pub const fn new(messages: &'a [Message]) -> Self {
        Self {
            system_prompt: "",
            memory: "",
            messages,
            tools: &[],
        }
    }

    /// Offer tools to the model
    #[must_use]
    pub const fn with_tools(mut self, tools: &'a [Arc<dyn Tool>]) -> Self {
        self.tools = tools;
        self
    }

    /// Attach a system prompt and project memory
    #[must_use]
    pub const fn with_system(mut self, system_prompt: &'a str, memory: &'a str) -> Self {
        self.system_prompt = system_prompt;
        self.memory = memory;
        self
    }
}

impl std::fmt::Debug for Conversation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("system_prompt", &self.system_prompt)
            .field("memory", &self.memory)
            .field("messages", &self.messages)
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Per-call context forwarded untouched to the transport
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Cancels the in-flight backend call
    pub cancellation: CancellationToken,
}

impl RequestContext {
    /// Context that is never cancelled
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context bound to an existing cancellation token
    pub const fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }
}

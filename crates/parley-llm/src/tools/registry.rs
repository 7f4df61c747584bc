//! Name-keyed tool registry where the first registration wins

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::LlmError;
use crate::types::{RequestContext, Tool, ToolCall, ToolOutput};

/// Thread-safe set of tools keyed by name
///
/// The first registration of a name wins; later ones are rejected.
#[derive(Default)]
pub struct ToolRegistry {
    tools: DashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool under its own name
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), LlmError> {
        let name = tool.name();
        if name.is_empty() {
            return Err(LlmError::ToolNameEmpty);
        }

        match self.tools.entry(name.to_owned()) {
            Entry::Occupied(entry) => Err(LlmError::ToolAlreadyRegistered {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!(tool = %entry.key(), "registered tool");
                entry.insert(tool);
                Ok(())
            }
        }
    }

    /// Tool registered under `name`
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>, LlmError> {
        self.tools
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LlmError::ToolNotFound { name: name.to_owned() })
    }

    /// Snapshot of every tool, sorted by name
    pub fn list(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools: Vec<_> = self.tools.iter().map(|entry| Arc::clone(entry.value())).collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
    }

    /// Remove the tool registered under `name`
    pub fn unregister(&self, name: &str) -> Result<(), LlmError> {
        self.tools
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| LlmError::ToolNotFound { name: name.to_owned() })
    }

    /// Number of registered tools
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Run the tool a backend asked for
    ///
    /// An unknown tool is an error. A tool that fails while running yields a
    /// failed [`ToolOutput`] so the caller can hand the error back to the model.
    pub async fn execute(&self, ctx: &RequestContext, call: &ToolCall) -> Result<ToolOutput, LlmError> {
        let tool = self.get(&call.name)?;

        tracing::debug!(tool = %call.name, call_id = %call.id, "executing tool");

        match tool.execute(ctx, &call.input).await {
            Ok(output) => Ok(output),
            Err(e) => {
                tracing::warn!(tool = %call.name, call_id = %call.id, error = %e, "tool execution failed");
                Ok(ToolOutput::failure(e.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.list().iter().map(|tool| tool.name().to_owned()).collect();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}

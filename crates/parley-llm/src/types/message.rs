use serde::{Deserialize, Serialize};

/// Role of a conversational turn
///
/// Deserialising an unrecognised role yields [`Role::User`] so a turn is
/// never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    /// Caller input
    User,
    /// Model output
    Assistant,
    /// Instruction turn
    System,
}

impl Role {
    /// Lowercase name of the role
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "assistant" => Self::Assistant,
            "system" => Self::System,
            _ => Self::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single conversational turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the turn
    pub role: Role,
    /// Plain text content
    pub content: String,
}

impl Message {
    /// Create a turn with an explicit role
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

//! Error taxonomy shared by adapters, transports and registries

use thiserror::Error;

/// Errors produced by the normalization layer
#[derive(Debug, Error)]
pub enum LlmError {
    /// AI features are turned off in configuration
    #[error("AI features are disabled for provider {provider}")]
    Disabled { provider: String },

    /// Required credential was not found in the environment
    #[error("API key not found for provider {provider}: environment variable {env_var} is not set")]
    CredentialMissing { provider: String, env_var: String },

    /// Provider configuration cannot produce a client
    #[error("invalid configuration for provider {provider}: {reason}")]
    InvalidConfig { provider: String, reason: String },

    /// No factory is registered under the requested name
    #[error("unsupported AI provider: {name} (available: {available})")]
    UnsupportedProvider { name: String, available: String },

    /// Tool registration was attempted with an empty name
    #[error("tool name cannot be empty")]
    ToolNameEmpty,

    /// A tool with the same name is already registered
    #[error("tool already registered: {name}")]
    ToolAlreadyRegistered { name: String },

    /// No tool is registered under the requested name
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// Backend answered without any content unit
    #[error("no response content from {provider}")]
    NoResponseContent { provider: String },

    /// Outbound payload could not be serialised
    #[error("failed to encode request for {provider}: {reason}")]
    RequestEncoding { provider: String, reason: String },

    /// Backend payload could not be decoded
    #[error("failed to decode response from {provider}: {reason}")]
    ResponseDecoding { provider: String, reason: String },

    /// Backend or transport failure
    #[error("failed to send message to {provider} (model: {model}, messages: {messages}, tools: {tools}): {cause}")]
    SendFailed {
        provider: String,
        model: String,
        messages: usize,
        tools: usize,
        #[source]
        cause: TransportError,
    },
}

/// Failure below the adapter, wrapped by [`LlmError::SendFailed`]
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection or protocol failure
    #[error("request failed: {0}")]
    Request(String),

    /// Backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The caller cancelled the request
    #[error("request cancelled")]
    Cancelled,
}

impl LlmError {
    /// Whether a higher layer may retry the same call
    ///
    /// Transport failures, rate limiting and server errors are retryable.
    /// Configuration, registry and decoding errors are not.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::SendFailed { cause, .. } => match cause {
                TransportError::Request(_) => true,
                TransportError::Status { status, .. } => *status == 429 || *status >= 500,
                TransportError::Cancelled => false,
            },
            _ => false,
        }
    }

    pub(crate) fn decoding(provider: &str, reason: impl std::fmt::Display) -> Self {
        Self::ResponseDecoding {
            provider: provider.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encoding(provider: &str, reason: impl std::fmt::Display) -> Self {
        Self::RequestEncoding {
            provider: provider.to_owned(),
            reason: reason.to_string(),
        }
    }
}

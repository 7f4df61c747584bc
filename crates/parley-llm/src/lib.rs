//! Provider-agnostic LLM client layer
//!
//! A canonical conversation model ([`types`]) is encoded into each backend's
//! wire format and decoded back ([`convert`]). Providers pair an adapter with
//! a transport and are created by name through a [`ProviderRegistry`]. Tools
//! offered to models live in a [`ToolRegistry`].

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod tools;
pub mod types;

pub use error::{LlmError, TransportError};
pub use provider::{AdapterClient, Client, ProviderRegistry, builtin_defaults, builtin_registry};
pub use tools::ToolRegistry;
pub use types::{Conversation, Message, RequestContext, Response, Role, StopReason, Tool, ToolCall, ToolOutput, Usage};

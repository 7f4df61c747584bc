//! Provider-agnostic canonical types
//!
//! Every adapter encodes from and decodes into these values, so callers never
//! see a backend's wire format.

pub mod message;
pub mod request;
pub mod response;
pub mod tool;

pub use message::{Message, Role};
pub use request::{Conversation, RequestContext};
pub use response::{Response, StopReason, Usage};
pub use tool::{ParamType, Parameter, Tool, ToolCall, ToolOutput};

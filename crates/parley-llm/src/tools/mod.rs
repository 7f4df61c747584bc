//! Tool registration and dispatch

mod registry;

pub use registry::ToolRegistry;

//! Tools for the voice dispatcher
//!
//! A registry of schema-described operations plus the built-in tools:
//! `calculator`, `datetime-tool`, `text-processor` and `web-search`.

pub mod builtin;
pub mod engines;
pub mod registry;

pub use builtin::{CalculatorTool, DateTimeTool, TextProcessorTool, WebSearchTool};
pub use engines::{SearchHit, SearchProvider, StubSearchProvider};
pub use registry::{create_default_registry, ToolExecutor, ToolRegistry, ToolRegistryError};

// Re-export the tool contract so callers need only this crate
pub use voice_dispatch_core::{
    ErrorCode, FailureKind, InputSchema, InvocationRequest, InvocationResult, PropertySchema, Tool,
    ToolDescriptor, ToolError,
};

//! Core traits for the voice dispatcher
//!
//! Every pluggable component sits behind one of these traits so that
//! backends can be swapped by configuration and replaced with doubles in tests.
//!
//! ```text
//! Speech:
//!   - TranscriptionProvider: Audio → Text
//!
//! Language Models:
//!   - LanguageModel: messages → completion
//!
//! Agents:
//!   - Agent: named responder consumed by the dispatch pipeline
//!
//! Tools:
//!   - Tool: schema-described operation invocable by id
//! ```

mod agent;
mod llm;
mod speech;
mod tool;

pub use agent::Agent;
pub use llm::LanguageModel;
pub use speech::TranscriptionProvider;
pub use tool::{
    validate_property, ErrorCode, InputSchema, PropertySchema, PropertyType, Tool,
    ToolDescriptor, ToolError, DEFAULT_TOOL_TIMEOUT_SECS,
};

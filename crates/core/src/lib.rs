//! Core traits and types for the voice dispatcher
//!
//! This crate provides foundational types used across all other crates:
//! - The tool contract (descriptors, schemas, validation, tool errors)
//! - Invocation results shared by the registry and its callers
//! - Audio payload and transcription result types
//! - Chat message types for the agent collaborator
//! - Traits for pluggable backends (transcription, language model, agent)
//! - Error types

pub mod audio;
pub mod error;
pub mod invocation;
pub mod llm_types;
pub mod traits;

pub use audio::{AudioPayload, ProviderKind, TranscriptionResult};
pub use error::{Error, Result};
pub use invocation::{FailureKind, InvocationRequest, InvocationResult};
pub use llm_types::{AgentReply, GenerateResponse, Message, Role};

pub use traits::{
    validate_property, Agent, ErrorCode, InputSchema, LanguageModel, PropertySchema,
    PropertyType, Tool, ToolDescriptor, ToolError, TranscriptionProvider,
    DEFAULT_TOOL_TIMEOUT_SECS,
};

//! Error types shared across the workspace

use thiserror::Error;

use crate::traits::ToolError;

/// Top-level error type
///
/// Crate-specific errors (`TranscriptionError`, `LlmError`, `DispatchError`, ...)
/// convert into this type at the trait boundaries defined in [`crate::traits`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Audio payload is empty")]
    MissingAudio,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Agent not found: {0}")]
    UnknownAgent(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Language model backends
//!
//! The dispatcher only needs `generate(messages) → text`; this crate provides
//! an Ollama chat backend behind the core [`LanguageModel`] trait.
//!
//! [`LanguageModel`]: voice_dispatch_core::LanguageModel

pub mod backend;

pub use backend::{LlmConfig, OllamaBackend};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for voice_dispatch_core::Error {
    fn from(err: LlmError) -> Self {
        voice_dispatch_core::Error::Llm(err.to_string())
    }
}

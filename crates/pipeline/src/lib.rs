//! Transcription front end
//!
//! Turns an uploaded audio clip into text:
//! - [`WhisperProvider`] when a credential is configured
//! - [`SimulatedTranscriber`] otherwise, clearly labelled as such
//!
//! [`Transcriber`] picks between them, bounds every call with a timeout and
//! tags each result with the provider kind that produced it.

pub mod stt;
pub mod transcriber;

pub use stt::{SimulatedTranscriber, WhisperConfig, WhisperProvider};
pub use transcriber::Transcriber;

use thiserror::Error;

/// Transcription errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionError {
    #[error("Audio payload is empty")]
    MissingAudio,

    #[error("Transcription provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Transcription provider {provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("Transcription configuration error: {0}")]
    Config(String),
}

impl From<TranscriptionError> for voice_dispatch_core::Error {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::MissingAudio => voice_dispatch_core::Error::MissingAudio,
            TranscriptionError::Timeout { timeout_ms, .. } => {
                voice_dispatch_core::Error::Timeout(timeout_ms)
            }
            TranscriptionError::Config(msg) => voice_dispatch_core::Error::Config(msg),
            other => voice_dispatch_core::Error::Transcription(other.to_string()),
        }
    }
}

//! Agents and request dispatch
//!
//! Features:
//! - Named agent directory
//! - General agent: language model plus a bounded tool-call loop
//! - Dispatch pipeline: transcription first, then the selected agent

pub mod directory;
pub mod dispatch;
pub mod general;

pub use directory::AgentDirectory;
pub use dispatch::{AgentDispatch, DispatchPipeline};
pub use general::{parse_tool_call, GeneralAgent, GENERAL_AGENT_NAME};

use thiserror::Error;
use voice_dispatch_core::TranscriptionResult;
use voice_dispatch_pipeline::TranscriptionError;

/// Dispatch errors
///
/// Transcription failures and agent lookup failures stay distinct so callers
/// can tell "could not hear you" from "no such assistant".
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Audio payload is empty")]
    MissingAudio,

    #[error("Transcription failed: {0}")]
    Transcription(TranscriptionError),

    /// Raised after transcription succeeded; the transcript is kept
    #[error("Agent not found: {agent}")]
    UnknownAgent {
        agent: String,
        transcription: TranscriptionResult,
    },

    #[error("Agent failed: {0}")]
    Agent(String),

    #[error("Agent already registered: {0}")]
    DuplicateAgent(String),
}

impl From<TranscriptionError> for DispatchError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::MissingAudio => DispatchError::MissingAudio,
            other => DispatchError::Transcription(other),
        }
    }
}

impl From<DispatchError> for voice_dispatch_core::Error {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::MissingAudio => voice_dispatch_core::Error::MissingAudio,
            DispatchError::Transcription(e) => e.into(),
            DispatchError::UnknownAgent { agent, .. } => {
                voice_dispatch_core::Error::UnknownAgent(agent)
            }
            DispatchError::Agent(msg) => voice_dispatch_core::Error::Agent(msg),
            DispatchError::DuplicateAgent(name) => voice_dispatch_core::Error::Config(format!(
                "Agent already registered: {}",
                name
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_audio_is_not_a_transcription_failure() {
        let err = DispatchError::from(TranscriptionError::MissingAudio);
        assert!(matches!(err, DispatchError::MissingAudio));

        let err = DispatchError::from(TranscriptionError::Provider {
            provider: "whisper".into(),
            message: "401".into(),
        });
        assert!(matches!(err, DispatchError::Transcription(_)));
    }

    #[test]
    fn test_core_conversion() {
        let err: voice_dispatch_core::Error = DispatchError::UnknownAgent {
            agent: "weatherAgent".into(),
            transcription: TranscriptionResult::real("hi"),
        }
        .into();
        assert!(matches!(err, voice_dispatch_core::Error::UnknownAgent(ref name) if name == "weatherAgent"));
    }
}

//! Voice Dispatch Server
//!
//! HTTP endpoints for transcription, agent dispatch and direct tool calls.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{detached_handle, init_metrics};
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use voice_dispatch_agent::DispatchError;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Audio file is required")]
    MissingAudio,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Agent '{agent}' not found")]
    UnknownAgent { agent: String, transcript: String },

    #[error("Failed to transcribe audio: {0}")]
    Transcription(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DispatchError> for ServerError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::MissingAudio => ServerError::MissingAudio,
            DispatchError::Transcription(e) => ServerError::Transcription(e.to_string()),
            DispatchError::UnknownAgent {
                agent,
                transcription,
            } => ServerError::UnknownAgent {
                agent,
                transcript: transcription.transcript,
            },
            DispatchError::Agent(msg) => ServerError::Internal(msg),
            DispatchError::DuplicateAgent(name) => {
                ServerError::Config(format!("Agent already registered: {}", name))
            }
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        err.status()
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::MissingAudio | ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::UnknownAgent { .. } => StatusCode::NOT_FOUND,
            ServerError::Transcription(_) | ServerError::Config(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    /// What was heard before the request failed
    #[serde(skip_serializing_if = "Option::is_none")]
    transcript: Option<String>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ServerError::MissingAudio => ErrorBody {
                error: "Audio file is required".to_string(),
                details: None,
                transcript: None,
            },
            ServerError::InvalidRequest(msg) => {
                tracing::warn!(error = %msg, "Invalid request");
                ErrorBody {
                    error: "Invalid request".to_string(),
                    details: Some(msg),
                    transcript: None,
                }
            }
            ServerError::UnknownAgent { agent, transcript } => ErrorBody {
                error: format!("Agent '{}' not found", agent),
                details: None,
                transcript: Some(transcript),
            },
            ServerError::Transcription(msg) => {
                tracing::error!(error = %msg, "Transcription failed");
                ErrorBody {
                    error: "Failed to transcribe audio".to_string(),
                    details: Some(msg),
                    transcript: None,
                }
            }
            ServerError::Config(msg) | ServerError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: Some(msg),
                    transcript: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_dispatch_core::TranscriptionResult;
    use voice_dispatch_pipeline::TranscriptionError;

    #[test]
    fn test_dispatch_error_status_mapping() {
        let cases = [
            (DispatchError::MissingAudio, StatusCode::BAD_REQUEST),
            (
                DispatchError::UnknownAgent {
                    agent: "x".into(),
                    transcription: TranscriptionResult::real("hi"),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DispatchError::Transcription(TranscriptionError::Timeout {
                    provider: "whisper".into(),
                    timeout_ms: 10,
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (DispatchError::Agent("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status(), status);
        }
    }

    #[test]
    fn test_unknown_agent_keeps_transcript() {
        let err = ServerError::from(DispatchError::UnknownAgent {
            agent: "weatherAgent".into(),
            transcription: TranscriptionResult::simulated("heard this"),
        });
        assert!(matches!(
            err,
            ServerError::UnknownAgent { ref transcript, .. } if transcript == "heard this"
        ));
        assert_eq!(err.to_string(), "Agent 'weatherAgent' not found");
    }
}

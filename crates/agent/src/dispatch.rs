//! Dispatch pipeline
//!
//! Transcribes the clip, then hands the transcript to the selected agent as a
//! single user message. The agent is only looked up once a transcript exists,
//! so an unknown agent name still returns what was heard.

use serde::Serialize;
use std::sync::Arc;
use voice_dispatch_core::{AudioPayload, Message, ProviderKind, TranscriptionResult};
use voice_dispatch_pipeline::Transcriber;

use crate::{AgentDirectory, DispatchError};

/// Transcript plus the agent's answer to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDispatch {
    pub transcript: String,
    pub provider: ProviderKind,
    pub agent_response: String,
    pub agent_name: String,
}

pub struct DispatchPipeline {
    transcriber: Arc<Transcriber>,
    agents: Arc<AgentDirectory>,
    default_agent: String,
}

impl DispatchPipeline {
    pub fn new(
        transcriber: Arc<Transcriber>,
        agents: Arc<AgentDirectory>,
        default_agent: impl Into<String>,
    ) -> Self {
        Self {
            transcriber,
            agents,
            default_agent: default_agent.into(),
        }
    }

    pub fn transcriber(&self) -> &Transcriber {
        &self.transcriber
    }

    pub fn agents(&self) -> &AgentDirectory {
        &self.agents
    }

    pub fn default_agent(&self) -> &str {
        &self.default_agent
    }

    pub async fn transcribe_only(
        &self,
        audio: &AudioPayload,
    ) -> Result<TranscriptionResult, DispatchError> {
        let outcome = self.transcriber.transcribe(audio).await.map_err(DispatchError::from);
        record("transcribe", &outcome);
        outcome
    }

    /// Transcribe, then ask `agent_name` (or the default agent)
    pub async fn transcribe_and_respond(
        &self,
        audio: &AudioPayload,
        agent_name: Option<&str>,
    ) -> Result<AgentDispatch, DispatchError> {
        let outcome = self.respond(audio, agent_name).await;
        record("respond", &outcome);
        outcome
    }

    async fn respond(
        &self,
        audio: &AudioPayload,
        agent_name: Option<&str>,
    ) -> Result<AgentDispatch, DispatchError> {
        let transcription = self.transcriber.transcribe(audio).await?;

        let name = agent_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.default_agent.as_str());

        let Some(agent) = self.agents.get(name) else {
            tracing::info!(agent = name, "Requested agent not found");
            return Err(DispatchError::UnknownAgent {
                agent: name.to_string(),
                transcription,
            });
        };

        if transcription.is_simulated() {
            tracing::debug!(agent = name, "Forwarding simulated transcript to agent");
        }

        let reply = agent
            .generate(&[Message::user(transcription.transcript.as_str())])
            .await
            .map_err(|e| DispatchError::Agent(e.to_string()))?;

        tracing::info!(
            agent = name,
            provider = %transcription.provider,
            tool_calls = reply.tool_calls.len(),
            "Agent responded"
        );

        Ok(AgentDispatch {
            transcript: transcription.transcript,
            provider: transcription.provider,
            agent_response: reply.text,
            agent_name: name.to_string(),
        })
    }
}

fn record<T>(route: &'static str, outcome: &Result<T, DispatchError>) {
    let status = match outcome {
        Ok(_) => "success",
        Err(DispatchError::MissingAudio) => "missing_audio",
        Err(DispatchError::Transcription(_)) => "transcription_error",
        Err(DispatchError::UnknownAgent { .. }) => "unknown_agent",
        Err(DispatchError::Agent(_)) | Err(DispatchError::DuplicateAgent(_)) => "agent_error",
    };
    metrics::counter!("dispatch_requests_total", "route" => route, "status" => status).increment(1);
}

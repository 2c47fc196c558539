//! Simulated transcriber
//!
//! Stands in for a real provider when no credential is configured. The output
//! is a deterministic function of payload size and file extension and always
//! says that it is simulated and which credential is missing.

use async_trait::async_trait;
use std::time::Duration;
use voice_dispatch_core::{AudioPayload, Result, TranscriptionProvider};

#[derive(Debug, Clone)]
pub struct SimulatedTranscriber {
    credential_env: String,
    latency: Duration,
}

impl SimulatedTranscriber {
    pub fn new(credential_env: impl Into<String>) -> Self {
        Self {
            credential_env: credential_env.into(),
            latency: Duration::ZERO,
        }
    }

    /// Artificial processing delay, useful for demos
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Placeholder transcript for a payload
    pub fn describe(&self, audio: &AudioPayload) -> String {
        let extension = audio.extension().unwrap_or_else(|| "unknown".to_string());
        format!(
            "[simulated transcription] Received a {} file ({} bytes). \
             Real speech recognition requires the {} environment variable to be set.",
            extension,
            audio.len(),
            self.credential_env
        )
    }
}

impl Default for SimulatedTranscriber {
    fn default() -> Self {
        Self::new("OPENAI_API_KEY")
    }
}

#[async_trait]
impl TranscriptionProvider for SimulatedTranscriber {
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.describe(audio))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_placeholder() {
        let transcriber = SimulatedTranscriber::default();
        let audio = AudioPayload::new(vec![0u8; 2048], "memo.WEBM");

        let first = transcriber.transcribe(&audio).await.unwrap();
        let second = transcriber.transcribe(&audio).await.unwrap();
        assert_eq!(first, second);
        assert!(first.contains("webm file (2048 bytes)"));
        assert!(first.contains("OPENAI_API_KEY"));
        assert!(first.starts_with("[simulated transcription]"));
    }

    #[test]
    fn test_unknown_extension() {
        let transcriber = SimulatedTranscriber::new("STT_KEY");
        let text = transcriber.describe(&AudioPayload::new(vec![1, 2], "recording"));
        assert!(text.contains("unknown file (2 bytes)"));
        assert!(text.contains("STT_KEY"));
    }
}

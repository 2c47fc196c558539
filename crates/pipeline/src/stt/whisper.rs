//! OpenAI-compatible Whisper provider
//!
//! Posts the clip to `/v1/audio/transcriptions` as multipart form data and
//! asks for a plain-text response.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use voice_dispatch_config::TranscriptionConfig;
use voice_dispatch_core::{AudioPayload, Error, Result, TranscriptionProvider};

use crate::TranscriptionError;

/// Extension assumed when the upload has none
const DEFAULT_EXTENSION: &str = "wav";

#[derive(Debug, Clone)]
pub struct WhisperConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub language: Option<String>,
    /// HTTP-level timeout; the transcriber applies its own bound on top
    pub timeout: Duration,
}

impl WhisperConfig {
    pub fn from_settings(settings: &TranscriptionConfig, api_key: String) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key,
            model: settings.model.clone(),
            language: settings.language.clone(),
            timeout: Duration::from_millis(settings.timeout_ms),
        }
    }
}

pub struct WhisperProvider {
    client: reqwest::Client,
    config: WhisperConfig,
}

impl WhisperProvider {
    pub fn new(config: WhisperConfig) -> std::result::Result<Self, TranscriptionError> {
        if config.api_key.trim().is_empty() {
            return Err(TranscriptionError::Config("Whisper API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                TranscriptionError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }
}

fn provider_error(message: impl Into<String>) -> Error {
    Error::Transcription(message.into())
}

/// File type sent to the provider: the upload's extension, else `wav`
pub(crate) fn file_type(audio: &AudioPayload) -> String {
    audio
        .extension()
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

pub(crate) fn mime_for(file_type: &str) -> &'static str {
    match file_type {
        "wav" => "audio/wav",
        "mp3" | "mpga" | "mpeg" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "ogg" | "oga" => "audio/ogg",
        "webm" => "audio/webm",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperProvider {
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String> {
        let file_type = file_type(audio);

        tracing::debug!(
            model = %self.config.model,
            file_type = %file_type,
            audio_bytes = audio.len(),
            "Sending audio to Whisper API"
        );

        let part = Part::bytes(audio.data().to_vec())
            .file_name(format!("audio.{}", file_type))
            .mime_str(mime_for(&file_type))
            .map_err(|e| provider_error(format!("failed to build multipart body: {}", e)))?;

        let mut form = Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("response_format", "text");
        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| provider_error(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(provider_error(format!("API returned {}: {}", status, body)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| provider_error(format!("failed to read response: {}", e)))?;

        let transcript = text.trim();
        if transcript.is_empty() {
            return Err(provider_error("empty transcript"));
        }

        Ok(transcript.to_string())
    }

    fn name(&self) -> &str {
        "whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str, api_key: &str) -> WhisperConfig {
        WhisperConfig {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: "whisper-1".to_string(),
            language: None,
            timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_file_type_defaults_to_wav() {
        assert_eq!(file_type(&AudioPayload::new(vec![1], "clip.MP3")), "mp3");
        assert_eq!(file_type(&AudioPayload::new(vec![1], "clip")), "wav");
        assert_eq!(mime_for("mp3"), "audio/mpeg");
        assert_eq!(mime_for("xyz"), "application/octet-stream");
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = WhisperProvider::new(config("https://api.openai.com/v1/audio/transcriptions", " "))
            .err()
            .unwrap();
        assert!(matches!(err, TranscriptionError::Config(_)));
    }

    /// Loopback address whose listener has already been dropped
    fn closed_local_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}/v1/audio/transcriptions", port)
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_error() {
        let provider = WhisperProvider::new(config(&closed_local_endpoint(), "sk-test")).unwrap();
        let err = provider
            .transcribe(&AudioPayload::new(vec![0u8; 16], "clip.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transcription(ref msg) if msg.starts_with("request failed")));
    }
}

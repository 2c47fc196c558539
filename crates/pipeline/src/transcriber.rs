//! Transcriber
//!
//! Entry point of the front end. Checks the payload, calls the configured
//! provider (or the simulated fallback) under a timeout, and tags the result.
//! Dropping the returned future aborts the in-flight provider call.

use std::sync::Arc;
use std::time::{Duration, Instant};
use voice_dispatch_config::TranscriptionConfig;
use voice_dispatch_core::{AudioPayload, Error, TranscriptionProvider, TranscriptionResult};

use crate::stt::{SimulatedTranscriber, WhisperConfig, WhisperProvider};
use crate::TranscriptionError;

pub struct Transcriber {
    /// Real provider; `None` means simulated mode
    provider: Option<Arc<dyn TranscriptionProvider>>,
    fallback: SimulatedTranscriber,
    timeout: Duration,
}

impl Transcriber {
    pub fn new(
        provider: Option<Arc<dyn TranscriptionProvider>>,
        fallback: SimulatedTranscriber,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            fallback,
            timeout,
        }
    }

    /// Transcriber backed by a real provider
    pub fn with_provider(provider: Arc<dyn TranscriptionProvider>, timeout: Duration) -> Self {
        Self::new(Some(provider), SimulatedTranscriber::default(), timeout)
    }

    /// Transcriber that only ever simulates
    pub fn simulated(fallback: SimulatedTranscriber) -> Self {
        Self::new(None, fallback, Duration::from_secs(30))
    }

    /// Build from settings, using Whisper when the credential resolves
    pub fn from_config(config: &TranscriptionConfig) -> Result<Self, TranscriptionError> {
        let fallback = SimulatedTranscriber::new(config.api_key_env.clone())
            .with_latency(Duration::from_millis(config.simulated_latency_ms));
        let timeout = Duration::from_millis(config.timeout_ms);

        let provider: Option<Arc<dyn TranscriptionProvider>> = match config.resolve_api_key() {
            Some(api_key) => {
                let whisper = WhisperProvider::new(WhisperConfig::from_settings(config, api_key))?;
                tracing::info!(model = %config.model, "Transcription using Whisper provider");
                Some(Arc::new(whisper) as Arc<dyn TranscriptionProvider>)
            }
            None => {
                tracing::warn!(
                    credential_env = %config.api_key_env,
                    "No transcription credential configured; transcripts will be simulated"
                );
                None
            }
        };

        Ok(Self::new(provider, fallback, timeout))
    }

    pub fn is_simulated(&self) -> bool {
        self.provider.is_none()
    }

    pub fn provider_name(&self) -> &str {
        match &self.provider {
            Some(provider) => provider.name(),
            None => self.fallback.name(),
        }
    }

    pub async fn transcribe(
        &self,
        audio: &AudioPayload,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::MissingAudio);
        }

        let started = Instant::now();
        let (provider, simulated): (&dyn TranscriptionProvider, bool) = match &self.provider {
            Some(provider) => (provider.as_ref(), false),
            None => (&self.fallback as &dyn TranscriptionProvider, true),
        };
        let name = provider.name().to_string();

        let outcome = tokio::time::timeout(self.timeout, provider.transcribe(audio))
            .await
            .map_err(|_| TranscriptionError::Timeout {
                provider: name.clone(),
                timeout_ms: self.timeout.as_millis() as u64,
            })?;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("transcription_latency_ms", "provider" => name.clone()).record(elapsed_ms);

        let transcript = outcome.map_err(|e| provider_failure(&name, e))?;

        tracing::debug!(
            provider = %name,
            audio_bytes = audio.len(),
            elapsed_ms = elapsed_ms as u64,
            "Transcription complete"
        );

        Ok(if simulated {
            TranscriptionResult::simulated(transcript)
        } else {
            TranscriptionResult::real(transcript)
        })
    }
}

fn provider_failure(provider: &str, err: Error) -> TranscriptionError {
    match err {
        Error::MissingAudio => TranscriptionError::MissingAudio,
        Error::Timeout(timeout_ms) => TranscriptionError::Timeout {
            provider: provider.to_string(),
            timeout_ms,
        },
        Error::Transcription(message) => TranscriptionError::Provider {
            provider: provider.to_string(),
            message,
        },
        other => TranscriptionError::Provider {
            provider: provider.to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records what it was given and answers with a fixed transcript
    struct RecordingProvider {
        seen: Mutex<Vec<(Vec<u8>, String)>>,
        reply: voice_dispatch_core::Result<String>,
        delay: Duration,
    }

    impl RecordingProvider {
        fn replying(reply: voice_dispatch_core::Result<String>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                reply,
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl TranscriptionProvider for RecordingProvider {
        async fn transcribe(&self, audio: &AudioPayload) -> voice_dispatch_core::Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((audio.data().to_vec(), audio.file_name().to_string()));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(Error::Transcription(e.to_string())),
            }
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_simulated_when_unconfigured() {
        let transcriber = Transcriber::simulated(SimulatedTranscriber::default());
        let result = transcriber
            .transcribe(&AudioPayload::new(vec![7u8; 10], "hello.wav"))
            .await
            .unwrap();
        assert!(result.is_simulated());
        assert!(result.transcript.contains("OPENAI_API_KEY"));
        assert!(transcriber.is_simulated());
        assert_eq!(transcriber.provider_name(), "simulated");
    }

    #[tokio::test]
    async fn test_real_provider_receives_payload_unchanged() {
        let provider = Arc::new(RecordingProvider::replying(Ok("turn on the lights".into())));
        let transcriber = Transcriber::with_provider(provider.clone(), Duration::from_secs(1));

        let audio = AudioPayload::new(vec![1, 2, 3, 4], "cmd.m4a");
        let result = transcriber.transcribe(&audio).await.unwrap();

        assert_eq!(result, TranscriptionResult::real("turn on the lights"));
        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(vec![1, 2, 3, 4], "cmd.m4a".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_payload_rejected_before_provider() {
        let provider = Arc::new(RecordingProvider::replying(Ok("unused".into())));
        let transcriber = Transcriber::with_provider(provider.clone(), Duration::from_secs(1));

        let err = transcriber
            .transcribe(&AudioPayload::new(Vec::new(), "empty.wav"))
            .await
            .unwrap_err();
        assert_eq!(err, TranscriptionError::MissingAudio);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces() {
        let provider = Arc::new(RecordingProvider::replying(Err(Error::Transcription(
            "API returned 401".into(),
        ))));
        let transcriber = Transcriber::with_provider(provider, Duration::from_secs(1));

        let err = transcriber
            .transcribe(&AudioPayload::new(vec![1], "a.wav"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TranscriptionError::Provider { ref provider, .. } if provider == "recording"
        ));
    }

    #[tokio::test]
    async fn test_timeout() {
        let mut provider = RecordingProvider::replying(Ok("late".into()));
        provider.delay = Duration::from_secs(60);
        let transcriber = Transcriber::with_provider(Arc::new(provider), Duration::from_millis(20));

        let err = transcriber
            .transcribe(&AudioPayload::new(vec![1], "a.wav"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TranscriptionError::Timeout {
                provider: "recording".to_string(),
                timeout_ms: 20
            }
        );
    }

    #[test]
    fn test_from_config_without_credential() {
        let config = TranscriptionConfig {
            api_key_env: "VOICE_DISPATCH_TEST_NEVER_SET".to_string(),
            ..Default::default()
        };
        let transcriber = Transcriber::from_config(&config).unwrap();
        assert!(transcriber.is_simulated());
    }

    #[test]
    fn test_from_config_with_credential() {
        let config = TranscriptionConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let transcriber = Transcriber::from_config(&config).unwrap();
        assert!(!transcriber.is_simulated());
        assert_eq!(transcriber.provider_name(), "whisper");
    }
}

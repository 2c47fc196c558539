//! Speech processing traits

use crate::{AudioPayload, Result};
use async_trait::async_trait;

/// Speech-to-text provider
///
/// Implementations:
/// - `WhisperProvider` - OpenAI-compatible transcription endpoint
/// - `SimulatedTranscriber` - deterministic placeholder when no credential is configured
///
/// # Example
///
/// ```ignore
/// let provider: Arc<dyn TranscriptionProvider> = Arc::new(WhisperProvider::new(config)?);
/// let text = provider.transcribe(&audio).await?;
/// ```
#[async_trait]
pub trait TranscriptionProvider: Send + Sync + 'static {
    /// Transcribe a complete audio clip
    ///
    /// The payload is passed through unchanged; codec detection is left to
    /// the provider (usually from the file extension).
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

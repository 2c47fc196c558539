//! Audio payload and transcription result types

use serde::{Deserialize, Serialize};

/// Uploaded audio clip
///
/// Holds the raw encoded bytes exactly as received plus the client-supplied
/// file name, which is the only hint about the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    data: Vec<u8>,
    file_name: String,
}

impl AudioPayload {
    pub fn new(data: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            file_name: file_name.into(),
        }
    }

    /// Raw encoded audio bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Lower-cased file extension, if the file name has one
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.file_name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }
}

/// Which transcriber produced a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// A configured speech-to-text provider
    Real,
    /// The deterministic placeholder used when no provider is configured
    Simulated,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Real => "real",
            ProviderKind::Simulated => "simulated",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transcript tagged with its provider
///
/// Callers must check `provider` before treating the transcript as something
/// the user actually said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub transcript: String,
    pub provider: ProviderKind,
}

impl TranscriptionResult {
    pub fn real(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            provider: ProviderKind::Real,
        }
    }

    pub fn simulated(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            provider: ProviderKind::Simulated,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.provider == ProviderKind::Simulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        let audio = AudioPayload::new(vec![1, 2, 3], "clip.WAV");
        assert_eq!(audio.extension().as_deref(), Some("wav"));
        assert_eq!(audio.len(), 3);
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(AudioPayload::new(vec![1], "recording").extension(), None);
        assert_eq!(AudioPayload::new(vec![1], "recording.").extension(), None);
    }

    #[test]
    fn test_provider_kind_serialization() {
        let result = TranscriptionResult::simulated("hello");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["provider"], "simulated");
        assert!(result.is_simulated());
        assert!(!TranscriptionResult::real("hi").is_simulated());
    }
}

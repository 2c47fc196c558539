//! Transcription front end configuration

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Speech-to-text settings
///
/// A real provider is used only when an API key resolves, either from
/// `api_key` or from the environment variable named by `api_key_env`.
/// Otherwise the simulated transcriber answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Environment variable holding the provider credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Explicit credential, takes precedence over `api_key_env`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// OpenAI-compatible transcription endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// ISO-639-1 hint passed to the provider
    #[serde(default)]
    pub language: Option<String>,

    /// Upper bound for one provider call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Artificial delay of the simulated transcriber
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1/audio/transcriptions".to_string()
}
fn default_model() -> String {
    "whisper-1".to_string()
}
fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            language: None,
            timeout_ms: default_timeout_ms(),
            simulated_latency_ms: 0,
        }
    }
}

impl TranscriptionConfig {
    /// Resolve the provider credential; blank values count as unset
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::invalid(
                "transcription.timeout_ms",
                format!("Must be at least 100ms, got {}", self.timeout_ms),
            ));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::invalid(
                "transcription.endpoint",
                format!("Not an http(s) URL: {}", self.endpoint),
            ));
        }

        if self.api_key_env.trim().is_empty() {
            return Err(ConfigError::MissingField("transcription.api_key_env".to_string()));
        }

        Ok(())
    }
}

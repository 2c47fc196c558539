//! Agent and language model configuration

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Agent directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent used when a request names none
    #[serde(default = "default_agent")]
    pub default_agent: String,

    /// Tool-call rounds before the model must answer in text
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,

    /// Replaces the built-in system instructions of the general agent
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_agent() -> String {
    "generalAgent".to_string()
}
fn default_max_tool_rounds() -> usize {
    3
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            default_agent: default_agent(),
            max_tool_rounds: default_max_tool_rounds(),
            system_prompt: None,
        }
    }
}

impl AgentConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.default_agent.trim().is_empty() {
            return Err(ConfigError::MissingField("agent.default_agent".to_string()));
        }
        if self.max_tool_rounds > 10 {
            return Err(ConfigError::invalid(
                "agent.max_tool_rounds",
                format!("Must be at most 10, got {}", self.max_tool_rounds),
            ));
        }
        Ok(())
    }
}

/// Ollama-compatible chat backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_llm_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries on connection errors and 5xx responses
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_llm_endpoint() -> String {
    "http://localhost:11434".to_string()
}
fn default_llm_model() -> String {
    "llama3.2".to_string()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> usize {
    512
}
fn default_llm_timeout_ms() -> u64 {
    30_000
}
fn default_max_retries() -> u32 {
    2
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_llm_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl LlmSettings {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "llm.temperature",
                format!("Must be between 0.0 and 2.0, got {}", self.temperature),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }
        Ok(())
    }
}

//! Configuration management for the voice dispatcher
//!
//! Settings are layered, later sources winning:
//! - `config/default.{toml,yaml,json}`
//! - `config/{environment}` (selected by `VOICE_DISPATCH_ENV`)
//! - Environment variables with the `VOICE_DISPATCH` prefix and `__` separator,
//!   e.g. `VOICE_DISPATCH__SERVER__PORT=9000`

pub mod agent;
pub mod pipeline;
pub mod settings;
pub mod tools;

pub use agent::{AgentConfig, LlmSettings};
pub use pipeline::TranscriptionConfig;
pub use settings::{
    load_settings, load_settings_from, ObservabilityConfig, RuntimeEnvironment, ServerConfig,
    Settings, ENV_SELECTOR, ENV_PREFIX,
};
pub use tools::ToolsConfig;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

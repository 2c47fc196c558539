//! Built-in tool defaults

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Per-invocation handler timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// IANA zone used by the datetime tool when the caller names none
    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    /// Default `maxLength` of text summaries, in characters
    #[serde(default = "default_summary_max_length")]
    pub summary_max_length: usize,

    /// Default `maxResults` of web searches
    #[serde(default = "default_search_max_results")]
    pub search_max_results: usize,
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}
fn default_summary_max_length() -> usize {
    100
}
fn default_search_max_results() -> usize {
    5
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            default_timezone: default_timezone(),
            summary_max_length: default_summary_max_length(),
            search_max_results: default_search_max_results(),
        }
    }
}

impl ToolsConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("tools.timeout_secs", "Must be at least 1"));
        }

        if self.default_timezone.parse::<Tz>().is_err() {
            return Err(ConfigError::invalid(
                "tools.default_timezone",
                format!("Unknown IANA timezone: {}", self.default_timezone),
            ));
        }

        if self.summary_max_length == 0 {
            return Err(ConfigError::invalid("tools.summary_max_length", "Must be at least 1"));
        }

        if self.search_max_results == 0 {
            return Err(ConfigError::invalid("tools.search_max_results", "Must be at least 1"));
        }

        Ok(())
    }
}

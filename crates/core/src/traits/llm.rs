//! Language model trait

use crate::{GenerateResponse, Message, Result};
use async_trait::async_trait;

/// Text generation backend
///
/// The only contract the dispatcher relies on is
/// `generate(messages) → text`; everything else is diagnostics.
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate a completion for an ordered list of messages
    async fn generate(&self, messages: &[Message]) -> Result<GenerateResponse>;

    /// Check whether the backend is reachable
    async fn is_available(&self) -> bool;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

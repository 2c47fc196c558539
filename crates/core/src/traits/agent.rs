//! Agent trait

use crate::{AgentReply, Message, Result};
use async_trait::async_trait;

/// Named responder the dispatch pipeline hands transcripts to
#[async_trait]
pub trait Agent: Send + Sync + 'static {
    /// Stable lookup name, e.g. `generalAgent`
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    async fn generate(&self, messages: &[Message]) -> Result<AgentReply>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    struct EchoAgent;

    #[async_trait]
    impl Agent for EchoAgent {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, messages: &[Message]) -> Result<AgentReply> {
            let last = messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(AgentReply::text(last))
        }
    }

    #[tokio::test]
    async fn test_agent_object_safety() {
        let agent: Box<dyn Agent> = Box::new(EchoAgent);
        let reply = agent
            .generate(&[Message::system("be brief"), Message::user("hello")])
            .await
            .unwrap();
        assert_eq!(reply.text, "hello");
        assert!(reply.tool_calls.is_empty());
        assert_eq!(agent.description(), "");
    }
}

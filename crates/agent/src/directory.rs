//! Agent directory
//!
//! Built once at startup, then shared read-only behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;
use voice_dispatch_core::Agent;

use crate::DispatchError;

#[derive(Default)]
pub struct AgentDirectory {
    agents: HashMap<String, Arc<dyn Agent>>,
    order: Vec<String>,
}

impl AgentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, agent: Arc<dyn Agent>) -> Result<(), DispatchError> {
        let name = agent.name().to_string();
        if self.agents.contains_key(&name) {
            return Err(DispatchError::DuplicateAgent(name));
        }
        tracing::debug!(agent = %name, "Registered agent");
        self.order.push(name.clone());
        self.agents.insert(name, agent);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Agent names in registration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use voice_dispatch_core::{AgentReply, Message};

    struct NamedAgent(&'static str);

    #[async_trait]
    impl Agent for NamedAgent {
        fn name(&self) -> &str {
            self.0
        }

        async fn generate(&self, _messages: &[Message]) -> voice_dispatch_core::Result<AgentReply> {
            Ok(AgentReply::text(self.0))
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut directory = AgentDirectory::new();
        directory.register(Arc::new(NamedAgent("generalAgent"))).unwrap();
        directory.register(Arc::new(NamedAgent("mathAgent"))).unwrap();

        assert_eq!(directory.names(), &["generalAgent", "mathAgent"]);
        assert!(directory.contains("mathAgent"));
        assert!(directory.get("weatherAgent").is_none());
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut directory = AgentDirectory::new();
        directory.register(Arc::new(NamedAgent("generalAgent"))).unwrap();
        let err = directory
            .register(Arc::new(NamedAgent("generalAgent")))
            .unwrap_err();
        assert!(matches!(err, DispatchError::DuplicateAgent(ref n) if n == "generalAgent"));
        assert_eq!(directory.len(), 1);
    }
}

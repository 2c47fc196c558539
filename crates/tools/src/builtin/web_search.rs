//! Web Search Tool

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use voice_dispatch_core::{InputSchema, PropertySchema, Tool, ToolDescriptor, ToolError};

use crate::engines::search::{SearchProvider, StubSearchProvider};

pub struct WebSearchTool {
    descriptor: ToolDescriptor,
    provider: Arc<dyn SearchProvider>,
    default_max_results: usize,
}

impl WebSearchTool {
    pub const ID: &'static str = "web-search";

    /// Tool backed by the stub provider
    pub fn new(default_max_results: usize) -> Self {
        Self::with_provider(Arc::new(StubSearchProvider::new()), default_max_results)
    }

    pub fn with_provider(provider: Arc<dyn SearchProvider>, default_max_results: usize) -> Self {
        let hit = InputSchema::object()
            .property("title", PropertySchema::string("Result title"), true)
            .property("snippet", PropertySchema::string("Result snippet"), true)
            .property("url", PropertySchema::string("Result URL"), true);

        Self {
            descriptor: ToolDescriptor::new(
                Self::ID,
                "Search the web for information on any topic",
                InputSchema::object()
                    .property("query", PropertySchema::string("Search query"), true)
                    .property(
                        "maxResults",
                        PropertySchema::integer("Maximum number of results to return")
                            .with_minimum(1.0)
                            .with_default(json!(default_max_results)),
                        false,
                    ),
                InputSchema::object()
                    .property(
                        "results",
                        PropertySchema::array("Ranked results", PropertySchema::object("Result", hit)),
                        true,
                    )
                    .property("query", PropertySchema::string("The query as given"), true),
            ),
            provider,
            default_max_results,
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, input: Value) -> Result<Value, ToolError> {
        let query = input
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::missing_field("query"))?;
        let max_results = input
            .get("maxResults")
            .and_then(|v| v.as_f64())
            .map(|n| n.max(1.0) as usize)
            .unwrap_or(self.default_max_results);

        tracing::debug!(provider = self.provider.name(), max_results, "Running web search");

        let mut results = self.provider.search(query, max_results).await?;
        results.truncate(max_results);

        Ok(json!({
            "results": results,
            "query": query,
        }))
    }
}

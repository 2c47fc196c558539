//! Search adapter
//!
//! Callers depend only on [`SearchProvider`]; a real search backend plugs in
//! behind it without touching the `web-search` tool.

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use voice_dispatch_core::ToolError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Ranked hits, at most `max_results` of them
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError>;

    fn name(&self) -> &str;
}

/// Deterministic provider returning one synthetic hit that embeds the query
#[derive(Debug, Clone, Default)]
pub struct StubSearchProvider;

impl StubSearchProvider {
    pub fn new() -> Self {
        Self
    }

    fn result_url(query: &str) -> Result<String, ToolError> {
        Url::parse_with_params("https://example.com/search", &[("q", query)])
            .map(String::from)
            .map_err(|e| ToolError::internal(format!("failed to build result url: {}", e)))
    }
}

#[async_trait]
impl SearchProvider for StubSearchProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError> {
        let hit = SearchHit {
            title: format!("Search results for: {}", query),
            snippet: format!(
                "Information about {} was found. Connect a real search provider for live results.",
                query
            ),
            url: Self::result_url(query)?,
        };

        Ok(std::iter::once(hit).take(max_results).collect())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_embeds_query() {
        let hits = StubSearchProvider::new().search("rust async", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].title.contains("rust async"));
        assert_eq!(hits[0].url, "https://example.com/search?q=rust+async");
    }

    #[tokio::test]
    async fn test_stub_encodes_reserved_characters() {
        let hits = StubSearchProvider::new().search("a&b=c", 1).await.unwrap();
        assert_eq!(hits[0].url, "https://example.com/search?q=a%26b%3Dc");
    }

    #[tokio::test]
    async fn test_respects_max_results() {
        let hits = StubSearchProvider::new().search("anything", 0).await.unwrap();
        assert!(hits.is_empty());
    }
}

//! Tool Registry
//!
//! Manages tool registration, discovery, and invocation. Every outcome of an
//! invocation, including handler errors and timeouts, comes back as an
//! [`InvocationResult`]; nothing a handler does escapes as a raw error, and a
//! handler panic is reported as an execution error.

use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use voice_dispatch_config::ToolsConfig;
use voice_dispatch_core::{FailureKind, InvocationResult, Tool, ToolDescriptor, ToolError};

use crate::builtin::{CalculatorTool, DateTimeTool, TextProcessorTool, WebSearchTool};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolRegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Invalid tool configuration: {0}")]
    InvalidConfig(String),
}

/// Tool executor trait
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Invoke a tool by id
    async fn invoke(&self, tool_id: &str, arguments: Value) -> InvocationResult;

    /// Descriptors of all tools, in registration order
    fn list_tools(&self) -> Vec<ToolDescriptor>;

    fn descriptor(&self, tool_id: &str) -> Option<ToolDescriptor>;
}

/// Tool registry
///
/// Built once at startup and read-only afterwards; share it behind an `Arc`.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
    timeout_override: Option<Duration>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            timeout_override: None,
        }
    }

    /// Apply one timeout to every tool instead of each tool's own
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), ToolRegistryError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolRegistryError> {
        let id = tool.id().to_string();
        if self.tools.contains_key(&id) {
            return Err(ToolRegistryError::DuplicateTool(id));
        }
        self.order.push(id.clone());
        self.tools.insert(id, tool);
        Ok(())
    }

    pub fn get(&self, tool_id: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(tool_id)
    }

    pub fn has(&self, tool_id: &str) -> bool {
        self.tools.contains_key(tool_id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool ids in registration order
    pub fn tool_ids(&self) -> &[String] {
        &self.order
    }

    fn timeout_for(&self, tool: &dyn Tool) -> Duration {
        self.timeout_override
            .unwrap_or_else(|| Duration::from_secs(tool.timeout_secs()))
    }

    /// Look up, validate, execute and wrap
    pub async fn invoke(&self, tool_id: &str, arguments: Value) -> InvocationResult {
        let started = Instant::now();
        let result = self.invoke_inner(tool_id, arguments).await;

        let status = match result.failure_kind() {
            None => "success",
            Some(kind) => kind.as_str(),
        };
        metrics::counter!(
            "tool_invocations_total",
            "tool" => tool_id.to_string(),
            "status" => status
        )
        .increment(1);
        metrics::histogram!("tool_invocation_latency_ms", "tool" => tool_id.to_string())
            .record(started.elapsed().as_secs_f64() * 1000.0);

        result
    }

    async fn invoke_inner(&self, tool_id: &str, arguments: Value) -> InvocationResult {
        let Some(tool) = self.tools.get(tool_id) else {
            tracing::debug!(tool = tool_id, "Unknown tool requested");
            return InvocationResult::failure(
                FailureKind::UnknownTool,
                format!("Tool not found: {}", tool_id),
            );
        };

        if let Err(e) = tool.validate(&arguments) {
            tracing::debug!(tool = tool_id, error = %e, "Tool arguments rejected");
            return InvocationResult::failure(FailureKind::InvalidInput, e.message);
        }

        let timeout = self.timeout_for(tool.as_ref());
        tracing::trace!(
            tool = tool_id,
            timeout_ms = timeout.as_millis() as u64,
            "Executing tool with timeout"
        );

        let execution = AssertUnwindSafe(tool.execute(arguments)).catch_unwind();
        let outcome = match tokio::time::timeout(timeout, execution).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(panic)) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(tool = tool_id, panic = %detail, "Tool handler panicked");
                Err(ToolError::internal(format!("tool '{}' failed unexpectedly", tool_id)))
            }
            Err(_elapsed) => Err(ToolError::timeout(tool_id, timeout.as_secs())),
        };

        match outcome {
            Ok(output) => {
                if let Err(violation) = tool.descriptor().output_schema.validate(&output) {
                    tracing::error!(
                        tool = tool_id,
                        violation = %violation,
                        "Tool output does not match its declared schema"
                    );
                    debug_assert!(false, "{} output violates schema: {}", tool_id, violation);
                }
                InvocationResult::success(output)
            }
            Err(e) => {
                tracing::warn!(tool = tool_id, code = %e.code, error = %e, "Tool execution failed");
                InvocationResult::execution_error(e)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn invoke(&self, tool_id: &str, arguments: Value) -> InvocationResult {
        ToolRegistry::invoke(self, tool_id, arguments).await
    }

    fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.tools.get(id))
            .map(|t| t.descriptor().clone())
            .collect()
    }

    fn descriptor(&self, tool_id: &str) -> Option<ToolDescriptor> {
        self.tools.get(tool_id).map(|t| t.descriptor().clone())
    }
}

/// Registry with the four built-in tools
pub fn create_default_registry(config: &ToolsConfig) -> Result<ToolRegistry, ToolRegistryError> {
    let timezone = config.default_timezone.parse::<chrono_tz::Tz>().map_err(|_| {
        ToolRegistryError::InvalidConfig(format!(
            "unknown default timezone: {}",
            config.default_timezone
        ))
    })?;

    let mut registry = ToolRegistry::new().with_timeout(Duration::from_secs(config.timeout_secs));
    registry.register(CalculatorTool::new())?;
    registry.register(DateTimeTool::new(timezone))?;
    registry.register(TextProcessorTool::new(config.summary_max_length))?;
    registry.register(WebSearchTool::new(config.search_max_results))?;

    tracing::info!(
        tool_count = registry.len(),
        timezone = %timezone,
        "Created default tool registry"
    );

    Ok(registry)
}

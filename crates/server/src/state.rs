//! Application State
//!
//! Everything here is built once at startup and shared read-only.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use voice_dispatch_agent::{AgentDirectory, DispatchPipeline, GeneralAgent};
use voice_dispatch_config::Settings;
use voice_dispatch_core::LanguageModel;
use voice_dispatch_pipeline::Transcriber;
use voice_dispatch_tools::{create_default_registry, ToolExecutor, ToolRegistry};

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    /// Tool registry
    pub tools: Arc<ToolRegistry>,
    pub dispatch: Arc<DispatchPipeline>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        settings: Settings,
        tools: Arc<ToolRegistry>,
        dispatch: Arc<DispatchPipeline>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            tools,
            dispatch,
            metrics,
        }
    }

    /// Wire the default registry, the transcriber and the general agent
    pub fn from_settings(
        settings: Settings,
        llm: Arc<dyn LanguageModel>,
        metrics: PrometheusHandle,
    ) -> Result<Self, ServerError> {
        let tools = Arc::new(
            create_default_registry(&settings.tools)
                .map_err(|e| ServerError::Config(e.to_string()))?,
        );
        let transcriber = Transcriber::from_config(&settings.transcription)
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let general = GeneralAgent::new(
            llm,
            tools.clone() as Arc<dyn ToolExecutor>,
            &settings.agent,
        );
        let mut agents = AgentDirectory::new();
        agents.register(Arc::new(general))?;

        if !agents.contains(&settings.agent.default_agent) {
            return Err(ServerError::Config(format!(
                "default agent '{}' is not registered (available: {})",
                settings.agent.default_agent,
                agents.names().join(", ")
            )));
        }

        let dispatch = DispatchPipeline::new(
            Arc::new(transcriber),
            Arc::new(agents),
            settings.agent.default_agent.clone(),
        );

        tracing::info!(
            tools = tools.len(),
            transcription = dispatch.transcriber().provider_name(),
            default_agent = dispatch.default_agent(),
            "Initialized application state"
        );

        Ok(Self::new(settings, tools, Arc::new(dispatch), metrics))
    }
}

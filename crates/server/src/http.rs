//! HTTP Endpoints
//!
//! REST API for the voice dispatcher.

use axum::{
    extract::{DefaultBodyLimit, Json, Multipart, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use voice_dispatch_agent::AgentDispatch;
use voice_dispatch_core::invocation::empty_arguments;
use voice_dispatch_core::{AudioPayload, FailureKind, InvocationResult, TranscriptionResult};
use voice_dispatch_tools::ToolExecutor;

use crate::metrics::metrics_handler;
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.settings.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let body_limit = server.max_body_bytes;
    let timeout = Duration::from_secs(server.timeout_seconds);

    Router::new()
        .route("/speech-to-text", post(speech_to_text))
        .route("/voice-to-agent", post(voice_to_agent))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/:id", post(call_tool))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - Disabled: permissive (development only)
/// - No valid origins: localhost:3000
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to localhost:3000");
        return layer.allow_origin(HeaderValue::from_static("http://localhost:3000"));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    layer.allow_origin(parsed_origins)
}

#[derive(Debug, Default)]
struct VoiceUpload {
    audio: Option<AudioPayload>,
    agent_name: Option<String>,
}

/// Collect the `audio` file and optional `agentName` field; others are ignored
async fn read_upload(mut multipart: Multipart) -> Result<VoiceUpload, ServerError> {
    let mut upload = VoiceUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
                upload.audio = Some(AudioPayload::new(data.to_vec(), file_name));
            }
            Some("agentName") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
                upload.agent_name = Some(text);
            }
            _ => {}
        }
    }

    Ok(upload)
}

/// Transcript only
async fn speech_to_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TranscriptionResult>, ServerError> {
    let upload = read_upload(multipart).await?;
    let audio = upload.audio.ok_or(ServerError::MissingAudio)?;

    let result = state.dispatch.transcribe_only(&audio).await?;
    Ok(Json(result))
}

/// Transcript handed to an agent
async fn voice_to_agent(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AgentDispatch>, ServerError> {
    let upload = read_upload(multipart).await?;
    let audio = upload.audio.ok_or(ServerError::MissingAudio)?;

    let dispatch = state
        .dispatch
        .transcribe_and_respond(&audio, upload.agent_name.as_deref())
        .await?;
    Ok(Json(dispatch))
}

/// List tools
async fn list_tools(State(state): State<AppState>) -> Json<Value> {
    let tools: Vec<Value> = state
        .tools
        .list_tools()
        .iter()
        .map(|t| t.to_json())
        .collect();

    Json(json!({ "tools": tools }))
}

/// Tool call request
#[derive(Debug, Deserialize)]
struct ToolCallRequest {
    #[serde(default = "empty_arguments")]
    arguments: Value,
}

/// Call tool
async fn call_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ToolCallRequest>,
) -> (StatusCode, Json<InvocationResult>) {
    let result = state.tools.invoke(&id, request.arguments).await;
    let status = match result.failure_kind() {
        None => StatusCode::OK,
        Some(FailureKind::UnknownTool) => StatusCode::NOT_FOUND,
        Some(FailureKind::InvalidInput) => StatusCode::BAD_REQUEST,
        Some(FailureKind::ExecutionError) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(result))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let transcriber = state.dispatch.transcriber();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.tools.len(),
        "agents": state.dispatch.agents().names(),
        "defaultAgent": state.dispatch.default_agent(),
        "transcription": {
            "provider": transcriber.provider_name(),
            "simulated": transcriber.is_simulated(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_variants() {
        let _ = build_cors_layer(&[], true);
        let _ = build_cors_layer(&["https://app.example.com".to_string()], true);
        let _ = build_cors_layer(&["bad\norigin".to_string()], true);
        let _ = build_cors_layer(&[], false);
    }
}

//! Voice Dispatch Server Entry Point

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use voice_dispatch_config::{load_settings, ObservabilityConfig, ENV_SELECTOR};
use voice_dispatch_core::LanguageModel;
use voice_dispatch_llm::{LlmConfig, OllamaBackend};
use voice_dispatch_server::{create_router, detached_handle, init_metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env} > config/default > defaults
    let env = std::env::var(ENV_SELECTOR).ok();
    let settings = load_settings(env.as_deref()).with_context(|| {
        format!(
            "Failed to load configuration (env: {})",
            env.as_deref().unwrap_or("default")
        )
    })?;

    init_tracing(&settings.observability);

    tracing::info!("Starting Voice Dispatch Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?settings.environment,
        config_env = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    let metrics = if settings.observability.metrics_enabled {
        let handle = init_metrics()?;
        tracing::info!("Initialized Prometheus metrics at /metrics");
        handle
    } else {
        detached_handle()
    };

    let llm = OllamaBackend::new(LlmConfig::from(&settings.llm))?;
    if !llm.is_available().await {
        tracing::warn!(
            endpoint = %settings.llm.endpoint,
            "Language model endpoint is not reachable; agent requests will fail until it is"
        );
    }

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server host/port")?;

    let state = AppState::from_settings(settings, Arc::new(llm), metrics)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &ObservabilityConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("voice_dispatch={},tower_http=debug", config.log_level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}

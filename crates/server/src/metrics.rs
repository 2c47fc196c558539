//! Prometheus metrics
//!
//! Counters and histograms are recorded with the `metrics` macros where the
//! work happens; this module only owns the exporter.

use axum::extract::State;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::{AppState, ServerError};

/// Install the global recorder and return its render handle
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Config(format!("Failed to install Prometheus recorder: {}", e)))
}

/// Handle backed by a recorder that is never installed
///
/// Renders nothing. Used when metrics are disabled and by tests, which cannot
/// install the global recorder more than once per process.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

pub async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}

//! Observability Metrics
//!
//! Prometheus recorder and the helpers the handlers call. Recording before
//! `init_metrics` is harmless: the `metrics` facade drops values when no
//! recorder is installed.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

use crate::state::AppState;
use crate::ServerError;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder
///
/// Calling it again returns the handle from the first call.
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Internal(format!("Failed to install Prometheus recorder: {}", e)))?;

    register_default_metrics();

    Ok(METRICS_HANDLE.get_or_init(|| handle).clone())
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

fn register_default_metrics() {
    gauge!("ingres_sessions_active").set(0.0);
    counter!("ingres_sessions_created_total").absolute(0);
    counter!("ingres_clarifications_total").absolute(0);

    for endpoint in ["classify", "classify_stateless", "sessions", "health", "reload"] {
        counter!("ingres_requests_total", "endpoint" => endpoint).absolute(0);
    }
}

pub fn record_session_created() {
    counter!("ingres_sessions_created_total").increment(1);
}

pub fn record_active_sessions(count: usize) {
    gauge!("ingres_sessions_active").set(count as f64);
}

pub fn record_request(endpoint: &'static str) {
    counter!("ingres_requests_total", "endpoint" => endpoint).increment(1);
}

/// Count one classification and its latency
pub fn record_classification(intent: &'static str, duration_secs: f64) {
    counter!("ingres_classifications_total", "intent" => intent).increment(1);
    histogram!("ingres_classification_duration_seconds").record(duration_secs);
}

pub fn record_clarification() {
    counter!("ingres_clarifications_total").increment(1);
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    record_active_sessions(state.sessions.count());

    match get_metrics_handle() {
        Some(handle) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            handle.render(),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}

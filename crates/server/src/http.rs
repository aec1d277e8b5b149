//! HTTP Endpoints
//!
//! REST API for session-scoped and stateless classification.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ingres_agent::TurnOutcome;
use ingres_core::{ClassificationResult, LocationReference};

use crate::auth::admin_auth;
use crate::metrics::{metrics_handler, record_classification, record_clarification, record_request};
use crate::session::SessionSummary;
use crate::state::AppState;
use crate::ServerError;

const DEV_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    drop(config);

    let admin = Router::new()
        .route("/admin/reload-patterns", post(reload_patterns))
        .route("/admin/reload-config", post(reload_config))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth));

    Router::new()
        // Sessions
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        // Classification
        .route("/api/classify", post(classify_stateless))
        .route("/api/classify/:session_id", post(classify_turn))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// Disabled CORS is permissive; no valid origins falls back to the local
/// dev front end.
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins");
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

    if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to {}", DEV_ORIGIN);
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static(DEV_ORIGIN))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// POST /api/sessions
async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServerError> {
    record_request("sessions");
    let session = state.sessions.create()?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": session.id,
        })),
    ))
}

/// GET /api/sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// GET /api/sessions/:id
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, ServerError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or(ServerError::SessionNotFound(id))?;
    Ok(Json(session.summary()))
}

/// DELETE /api/sessions/:id
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.sessions.remove(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    text: String,
}

/// POST /api/classify/:session_id
async fn classify_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<TurnOutcome>, ServerError> {
    record_request("classify");
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| ServerError::SessionNotFound(session_id.clone()))?;

    if request.text.trim().is_empty() {
        tracing::warn!(session_id = %session_id, "Empty classification input");
    }

    let outcome = session.process_turn(&state.facade, &request.text);

    record_classification(outcome.intent.as_str(), outcome.processing_time_ms / 1000.0);
    if outcome.awaiting_clarification {
        record_clarification();
    }

    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
struct StatelessResponse {
    #[serde(flatten)]
    result: ClassificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<LocationReference>,
    processing_time_ms: f64,
}

/// POST /api/classify
async fn classify_stateless(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Json<StatelessResponse> {
    record_request("classify_stateless");
    let started = Instant::now();

    if request.text.trim().is_empty() {
        tracing::warn!("Empty classification input");
    }

    let (result, location) = state.facade.classify_stateless(&request.text);
    let elapsed = started.elapsed().as_secs_f64();
    record_classification(result.intent.as_str(), elapsed);

    Json(StatelessResponse {
        result,
        location,
        processing_time_ms: elapsed * 1000.0,
    })
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    record_request("health");
    let registry = state.registry.snapshot();

    let status_code = if registry.is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if status_code == StatusCode::OK { "healthy" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
            "checks": {
                "patterns": {
                    "count": registry.len(),
                    "version": registry.version(),
                    "locales": registry.locales(),
                },
                "gazetteer": {
                    "states": state.gazetteer.states().len(),
                    "cities": state.gazetteer.cities().len(),
                },
                "sessions": {
                    "count": state.sessions.count(),
                },
            }
        })),
    )
}

/// POST /admin/reload-patterns
async fn reload_patterns(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ServerError> {
    record_request("reload");
    let count = state.reload_patterns()?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "patterns": count,
        "version": state.registry.snapshot().version(),
    })))
}

/// POST /admin/reload-config
///
/// Refreshes stored settings. Thresholds, CORS and session limits keep their
/// startup values.
async fn reload_config(State(state): State<AppState>) -> impl IntoResponse {
    record_request("reload");
    match state.reload_config() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "message": "Configuration reloaded successfully"
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Config reload failed: {}", e);
            e.into_response()
        }
    }
}

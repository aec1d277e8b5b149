//! INGRES Classifier Server
//!
//! HTTP endpoints for session-scoped and stateless query classification.

pub mod auth;
pub mod http;
pub mod metrics;
pub mod session;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_classification, record_request};
pub use session::{Session, SessionManager, SessionSummary};
pub use state::AppState;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session limit of {0} reached")]
    SessionLimit(usize),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ingres_config::ConfigError),

    #[error("Agent error: {0}")]
    Agent(#[from] ingres_agent::AgentError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::SessionLimit(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            // Invalid pattern file on reload
            ServerError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Agent(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        (
            status,
            Json(serde_json::json!({
                "status": "error",
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

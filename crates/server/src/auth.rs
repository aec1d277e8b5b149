//! Admin authentication
//!
//! API-key check for the `/admin` routes. Classification and session routes
//! stay public.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::state::AppState;

const API_KEY_HEADER: &str = "x-api-key";

/// Reject admin requests that lack the configured key
///
/// A no-op while `server.auth.enabled` is false.
pub async fn admin_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    // Read the key before awaiting so the lock is not held across the handler
    let expected = state
        .config
        .read()
        .server
        .auth
        .required_key()
        .map(str::to_owned);

    let Some(expected) = expected else {
        return next.run(request).await;
    };

    let verdict = presented_key(request.headers()).map(|key| keys_match(key, &expected));
    match verdict {
        Some(true) => next.run(request).await,
        Some(false) => {
            tracing::warn!(path = %request.uri().path(), "Rejected admin request with wrong API key");
            unauthorized("Invalid API key")
        }
        None => unauthorized("Missing API key"),
    }
}

/// Bearer token, else the `X-API-Key` header
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .or_else(|| headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// Comparison time depends only on the length
fn keys_match(presented: &str, expected: &str) -> bool {
    presented.len() == expected.len()
        && presented
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "status": "error",
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_presented_key_sources() {
        let mut headers = HeaderMap::new();
        assert_eq!(presented_key(&headers), None);

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("from-header"));
        assert_eq!(presented_key(&headers), Some("from-header"));

        // Bearer token takes precedence
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-bearer"));
        assert_eq!(presented_key(&headers), Some("from-bearer"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(presented_key(&headers), None);
    }

    #[test]
    fn test_keys_match() {
        assert!(keys_match("secret", "secret"));
        assert!(!keys_match("secreT", "secret"));
        assert!(!keys_match("secret-longer", "secret"));
        assert!(!keys_match("", "secret"));
    }
}

//! Static bearer-token authentication for the protected routes.

use crate::server::AppState;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Middleware validating `Authorization: Bearer <token>` against the
/// configured API token. Auth failures are the one case surfaced as a real
/// HTTP error status instead of the envelope.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.api_token.as_deref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "API_TOKEN is not configured"})),
        )
            .into_response();
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == expected => next.run(request).await,
        _ => (
            StatusCode::FORBIDDEN,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(json!({"detail": "Invalid authentication token"})),
        )
            .into_response(),
    }
}

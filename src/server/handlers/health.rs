use axum::Json;
use serde_json::{json, Value};

/// Liveness check; the one endpoint outside the envelope contract.
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

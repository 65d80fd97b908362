//! Flood-risk endpoint: a pass-through to the digital-twin platform.

use crate::server::envelope::Envelope;
use crate::server::AppState;
use axum::extract::State;
use axum::Json;
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RiskRequest {
    pub lat: f64,
    pub lon: f64,
    /// Rainfall event identifier (e.g. `design_2yr`, `design_10yr`).
    pub rainfall_event_id: Option<String>,
}

fn is_empty_payload(data: &Value) -> bool {
    data.is_null() || data.as_object().is_some_and(|o| o.is_empty())
}

/// `POST /risk`: point flood-risk assessment.
pub async fn get_risk(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RiskRequest>,
) -> Envelope {
    info!(
        "Fetching flood risk for ({}, {}), event: {:?}",
        request.lat, request.lon, request.rainfall_event_id
    );

    match state
        .digital_twin
        .risk(request.lat, request.lon, request.rainfall_event_id)
        .await
    {
        Ok(data) if is_empty_payload(&data) => {
            Envelope::error("No data returned from Digital Twin API")
        }
        Ok(data) => Envelope::ok(data),
        Err(e) => {
            warn!("Digital twin risk call failed: {e}");
            Envelope::error(format!("Error: {e}"))
        }
    }
}

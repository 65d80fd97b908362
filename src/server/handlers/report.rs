//! Issue-report endpoint: forwards user reports to the digital-twin platform.

use crate::clients::digital_twin::IssueReport;
use crate::server::envelope::Envelope;
use crate::server::AppState;
use axum::extract::State;
use axum::Json;
use log::warn;
use serde_json::Value;
use std::sync::Arc;

fn is_empty_payload(data: &Value) -> bool {
    data.is_null() || data.as_object().is_some_and(|o| o.is_empty())
}

/// `POST /report`: submits a flooding/infrastructure issue report.
pub async fn submit_report(
    State(state): State<Arc<AppState>>,
    Json(report): Json<IssueReport>,
) -> Envelope {
    match state.digital_twin.report(&report).await {
        Ok(data) if is_empty_payload(&data) => {
            Envelope::error("No data returned from Digital Twin API")
        }
        Ok(data) => Envelope::ok(data),
        Err(e) => {
            warn!("Digital twin report call failed: {e}");
            Envelope::error(format!("Error: {e}"))
        }
    }
}

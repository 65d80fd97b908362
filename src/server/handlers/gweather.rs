//! Commercial weather API endpoints: one reshaped summary plus three
//! pass-throughs.

use crate::server::envelope::Envelope;
use crate::server::handlers::weather::WeatherRequest;
use crate::server::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// Pulls the condition summary fields out of a currentConditions payload.
/// Any missing field invalidates the reshape.
fn reshape_conditions(data: &Value) -> Option<Value> {
    let weather_condition = data.get("weatherCondition")?;
    let condition = weather_condition.get("description")?.get("text")?.clone();
    let forecast_icon_uri = weather_condition.get("iconBaseUri")?.clone();
    let temperature = data.get("temperature")?.get("degrees")?.clone();
    let feels_like = data.get("feelsLikeTemperature")?.get("degrees")?.clone();
    Some(json!({
        "condition": condition,
        "temperature": temperature,
        "feels_like": feels_like,
        "forecast_icon_uri": forecast_icon_uri,
    }))
}

/// `POST /google/conditions`: current conditions reshaped to a summary.
pub async fn get_conditions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Envelope {
    match state.google.conditions(request.lat, request.lon).await {
        Ok(data) => match reshape_conditions(&data) {
            Some(summary) => Envelope::ok(summary),
            None => Envelope::error("Unexpected response shape from Google Weather API"),
        },
        Err(e) => Envelope::error(format!("Error: {e}")),
    }
}

/// `POST /google/forecast/hourly`: hourly forecast pass-through.
pub async fn get_hourly_forecast(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Envelope {
    match state.google.hourly_forecast(request.lat, request.lon).await {
        Ok(data) => Envelope::ok(data),
        Err(e) => Envelope::error(format!("Error: {e}")),
    }
}

/// `POST /google/forecast/daily`: daily forecast pass-through.
pub async fn get_daily_forecast(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Envelope {
    match state.google.daily_forecast(request.lat, request.lon).await {
        Ok(data) => Envelope::ok(data),
        Err(e) => Envelope::error(format!("Error: {e}")),
    }
}

/// `POST /google/history`: historical hourly pass-through.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Envelope {
    match state.google.history(request.lat, request.lon).await {
        Ok(data) => Envelope::ok(data),
        Err(e) => Envelope::error(format!("Error: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reshape_extracts_summary_fields() {
        let payload = json!({
            "weatherCondition": {
                "description": {"text": "Partly cloudy"},
                "iconBaseUri": "https://example.com/icons/partly_cloudy"
            },
            "temperature": {"degrees": 21.5, "unit": "CELSIUS"},
            "feelsLikeTemperature": {"degrees": 19.0, "unit": "CELSIUS"}
        });
        let summary = reshape_conditions(&payload).unwrap();
        assert_eq!(summary["condition"], "Partly cloudy");
        assert_eq!(summary["temperature"], 21.5);
        assert_eq!(summary["feels_like"], 19.0);
    }

    #[test]
    fn reshape_rejects_incomplete_payloads() {
        assert!(reshape_conditions(&json!({"temperature": {"degrees": 20.0}})).is_none());
    }
}

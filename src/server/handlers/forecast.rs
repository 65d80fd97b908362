//! Forecast and condition-summary endpoints.

use crate::bom::forecast::parse_forecast_for_area;
use crate::geo::LatLon;
use crate::server::envelope::Envelope;
use crate::server::handlers::weather::WeatherRequest;
use crate::server::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

/// `POST /forecast`: forecast periods for the nearest station's area code.
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Envelope {
    let Some((station, _)) = state.stations.nearest(LatLon(request.lat, request.lon)) else {
        return Envelope::error("No weather station found");
    };

    let xml = match state.bom.fetch_forecast_xml().await {
        Ok(xml) => xml,
        Err(e) => return Envelope::error(format!("Error: {e}")),
    };
    match parse_forecast_for_area(&xml, &station.aac) {
        Ok(periods) => match serde_json::to_value(periods) {
            Ok(value) => Envelope::ok(value),
            Err(e) => Envelope::error(format!("Error: {e}")),
        },
        Err(e) => Envelope::error(format!("Error: {e}")),
    }
}

/// `POST /weathercondition`: a one-glance summary combining the first
/// forecast period's précis and icon code with the latest observed
/// temperature.
pub async fn get_weather_condition(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Envelope {
    let Some((station, _)) = state.stations.nearest(LatLon(request.lat, request.lon)) else {
        return Envelope::error("No weather station found");
    };

    let xml = match state.bom.fetch_forecast_xml().await {
        Ok(xml) => xml,
        Err(e) => return Envelope::error(format!("Error: {e}")),
    };
    let periods = match parse_forecast_for_area(&xml, &station.aac) {
        Ok(periods) => periods,
        Err(e) => return Envelope::error(format!("Error: {e}")),
    };

    let precis = periods
        .first()
        .and_then(|p| p.forecast.get("precis").cloned())
        .flatten();
    // The `element` field carries the BOM forecast icon code.
    let forecast_icon_code = periods
        .first()
        .and_then(|p| p.forecast.get("element").cloned())
        .flatten();

    let temperature: Option<Value> = match state.bom.fetch_observation(station).await {
        Ok(observations) => observations
            .first()
            .and_then(|obs| obs.get("air_temp").cloned()),
        Err(e) => return Envelope::error(format!("Error: {e}")),
    };

    Envelope::ok(json!({
        "precis": precis,
        "temperature": temperature,
        "forecast_icon_code": forecast_icon_code,
    }))
}

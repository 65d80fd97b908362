//! Current and historical weather endpoints.

use crate::bom::history::fetch_historical_data;
use crate::geo::LatLon;
use crate::server::envelope::Envelope;
use crate::server::AppState;
use crate::stations::directory::Station;
use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct WeatherRequest {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalWeatherRequest {
    pub lat: f64,
    pub lon: f64,
    /// Format: `YYYY-MM-DD`.
    pub start_date: String,
    /// Format: `YYYY-MM-DD`.
    pub end_date: String,
}

/// Observation fields exposed to clients, as `(output key, upstream key)`.
/// The upstream `name` field is surfaced as `station_name`.
const OBSERVATION_FIELDS: [(&str, &str); 16] = [
    ("station_name", "name"),
    ("local_date_time", "local_date_time"),
    ("local_date_time_full", "local_date_time_full"),
    ("lat", "lat"),
    ("lon", "lon"),
    ("air_temp", "air_temp"),
    ("apparent_t", "apparent_t"),
    ("dewpt", "dewpt"),
    ("rain_trace", "rain_trace"),
    ("rel_hum", "rel_hum"),
    ("wind_dir", "wind_dir"),
    ("wind_spd_kmh", "wind_spd_kmh"),
    ("gust_kmh", "gust_kmh"),
    ("weather", "weather"),
    ("cloud", "cloud"),
    ("vis_km", "vis_km"),
];

pub(crate) fn station_info(station: &Station) -> Value {
    json!({
        "name": station.name,
        "station_id": station.station_id,
        "lat": station.lat,
        "lon": station.lon,
    })
}

fn filter_observation(observation: &Map<String, Value>) -> Value {
    let mut filtered = Map::with_capacity(OBSERVATION_FIELDS.len());
    for (output_key, upstream_key) in OBSERVATION_FIELDS {
        let value = observation.get(upstream_key).cloned().unwrap_or(Value::Null);
        filtered.insert(output_key.to_string(), value);
    }
    Value::Object(filtered)
}

/// `POST /weather`: nearest station plus its latest filtered observations.
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WeatherRequest>,
) -> Envelope {
    let Some((station, _)) = state.stations.nearest(LatLon(request.lat, request.lon)) else {
        return Envelope::error("No weather station found");
    };

    match state.bom.fetch_observation(station).await {
        Ok(observations) => {
            let filtered: Vec<Value> = observations.iter().map(filter_observation).collect();
            Envelope::ok(json!({
                "station_info": station_info(station),
                "observations": filtered,
            }))
        }
        Err(e) => Envelope::error(format!("Error: {e}")),
    }
}

/// `POST /weather/historical`: month-by-month historical rows for the nearest
/// station, restricted to the requested date range.
pub async fn get_historical_weather(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HistoricalWeatherRequest>,
) -> Envelope {
    let start = match NaiveDate::parse_from_str(&request.start_date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            return Envelope::error(format!("Invalid date format. Use YYYY-MM-DD format: {e}"))
        }
    };
    let end = match NaiveDate::parse_from_str(&request.end_date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            return Envelope::error(format!("Invalid date format. Use YYYY-MM-DD format: {e}"))
        }
    };
    if start > end {
        return Envelope::error("Start date must be before or equal to end date");
    }

    let Some((station, _)) = state.stations.nearest(LatLon(request.lat, request.lon)) else {
        return Envelope::error("No weather station found");
    };

    let rows = fetch_historical_data(&state.bom, station, start, end).await;
    Envelope::ok(json!({
        "station_info": station_info(station),
        "date_range": {
            "start_date": request.start_date,
            "end_date": request.end_date,
        },
        "records_count": rows.len(),
        "historical_data": rows,
    }))
}

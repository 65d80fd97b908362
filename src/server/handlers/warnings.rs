//! Weather-warning endpoints.

use crate::bom::warnings::{build_warnings, fetch_warning_feed, Warning};
use crate::geo::LatLon;
use crate::server::envelope::Envelope;
use crate::server::AppState;
use crate::stations::directory::Station;
use axum::extract::{Query, State};
use axum::Json;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const FEED_SOURCE: &str = "Bureau of Meteorology - Western Australia";

#[derive(Debug, Deserialize)]
pub struct WarningsRequest {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: Option<f64>,
    pub fetch_details: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AllWarningsQuery {
    #[serde(default = "default_fetch_details")]
    pub fetch_details: bool,
}

fn default_fetch_details() -> bool {
    true
}

/// Annotates each warning with the request location and nearest-station
/// context. Warnings are not filtered by radius: the feed carries no per-item
/// coordinates, so the radius is echoed back as context only.
fn annotate_with_location(
    warnings: &[Warning],
    lat: f64,
    lon: f64,
    radius_km: f64,
    nearest: Option<(&Station, f64)>,
) -> Vec<Value> {
    warnings
        .iter()
        .map(|warning| {
            let mut value = serde_json::to_value(warning).unwrap_or(Value::Null);
            if let Value::Object(map) = &mut value {
                map.insert(
                    "request_location".to_string(),
                    json!({"lat": lat, "lon": lon, "radius_km": radius_km}),
                );
                if let Some((station, distance_km)) = nearest {
                    map.insert(
                        "nearest_station".to_string(),
                        json!({"name": station.name, "distance_km": distance_km}),
                    );
                }
            }
            value
        })
        .collect()
}

/// `POST /warnings`: active warnings with request-location context.
pub async fn get_warnings(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WarningsRequest>,
) -> Envelope {
    let radius_km = request.radius_km.unwrap_or(100.0);
    let fetch_details = request.fetch_details.unwrap_or(true);
    info!(
        "Fetching weather warnings for ({}, {}), radius {radius_km} km, details: {fetch_details}",
        request.lat, request.lon
    );

    let feed = fetch_warning_feed(&state.bom).await;
    let warnings = build_warnings(&state.bom, &feed, fetch_details).await;

    let nearest = state.stations.nearest(LatLon(request.lat, request.lon));
    let annotated =
        annotate_with_location(&warnings, request.lat, request.lon, radius_km, nearest);
    info!("Found {} warnings in the area", annotated.len());

    let nearest_station = nearest.map(|(station, _)| {
        json!({
            "name": station.name,
            "station_id": station.station_id,
            "lat": station.lat,
            "lon": station.lon,
        })
    });

    Envelope::ok(json!({
        "location": {
            "lat": request.lat,
            "lon": request.lon,
            "radius_km": radius_km,
        },
        "nearest_station": nearest_station,
        "total_warnings": annotated.len(),
        "warnings": annotated,
        "feed_info": {
            "source": FEED_SOURCE,
            "url": feed.source_url,
            "details_fetched": fetch_details,
        },
    }))
}

/// `GET /warnings/all`: every active warning, no location context.
pub async fn get_all_warnings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AllWarningsQuery>,
) -> Envelope {
    info!(
        "Fetching all weather warnings, details: {}",
        query.fetch_details
    );

    let feed = fetch_warning_feed(&state.bom).await;
    let warnings = build_warnings(&state.bom, &feed, query.fetch_details).await;
    info!("Found {} total warnings", warnings.len());

    match serde_json::to_value(&warnings) {
        Ok(warnings_value) => Envelope::ok(json!({
            "total_warnings": warnings.len(),
            "warnings": warnings_value,
            "feed_info": {
                "source": FEED_SOURCE,
                "url": feed.source_url,
                "details_fetched": query.fetch_details,
            },
        })),
        Err(e) => Envelope::error(format!("Error: {e}")),
    }
}

//! HTTP composition: shared state, routing, and the auth layer.

pub mod auth;
pub mod envelope;
pub mod handlers;

use crate::bom::client::BomClient;
use crate::clients::digital_twin::DigitalTwinClient;
use crate::clients::google::GoogleWeatherClient;
use crate::config::AppConfig;
use crate::stations::directory::StationDirectory;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Read-only state shared by every handler. Nothing here mutates after
/// startup, so requests need no cross-request coordination.
pub struct AppState {
    pub config: AppConfig,
    pub stations: StationDirectory,
    pub bom: BomClient,
    pub google: GoogleWeatherClient,
    pub digital_twin: DigitalTwinClient,
}

impl AppState {
    pub fn new(config: AppConfig, stations: StationDirectory) -> Self {
        let google = GoogleWeatherClient::new(
            config.google_base_url.clone(),
            config.google_api_key.clone(),
        );
        let digital_twin =
            DigitalTwinClient::new(config.dt_base_url.clone(), config.dt_api_token.clone());
        Self {
            config,
            stations,
            bom: BomClient::new(),
            google,
            digital_twin,
        }
    }
}

/// Builds the full application router, nested under `/api/v1`.
///
/// The BOM-backed endpoints sit behind the bearer-token layer; health, the
/// commercial weather pass-throughs, and the digital-twin endpoints are open,
/// mirroring the upstream services' own access control.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/weather", post(handlers::weather::get_weather))
        .route(
            "/weather/historical",
            post(handlers::weather::get_historical_weather),
        )
        .route("/forecast", post(handlers::forecast::get_forecast))
        .route(
            "/weathercondition",
            post(handlers::forecast::get_weather_condition),
        )
        .route("/warnings", post(handlers::warnings::get_warnings))
        .route("/warnings/all", get(handlers::warnings::get_all_warnings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    let open = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/google/conditions", post(handlers::gweather::get_conditions))
        .route(
            "/google/forecast/hourly",
            post(handlers::gweather::get_hourly_forecast),
        )
        .route(
            "/google/forecast/daily",
            post(handlers::gweather::get_daily_forecast),
        )
        .route("/google/history", post(handlers::gweather::get_history))
        .route("/risk", post(handlers::risk::get_risk))
        .route("/report", post(handlers::report::submit_report));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", protected.merge(open))
        .layer(cors)
        .with_state(state)
}

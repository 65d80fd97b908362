mod bom;
mod clients;
mod config;
mod geo;
mod server;
mod stations;

pub use config::AppConfig;
pub use geo::{distance_km, LatLon};

pub use stations::directory::{Station, StationDirectory};
pub use stations::error::StationDirectoryError;

pub use bom::client::BomClient;
pub use bom::error::BomError;
pub use bom::forecast::{parse_forecast_for_area, ForecastPeriod};
pub use bom::history::{fetch_historical_data, months_in_range, parse_month_csv};
pub use bom::warnings::{
    build_warnings, classify_warning, fetch_warning_feed, parse_feed_entries, DetailOutcome,
    FeedEntry, Warning, WarningDetails, WarningFeed,
};

pub use clients::digital_twin::{DigitalTwinClient, DigitalTwinError, IssueReport};
pub use clients::google::{GoogleWeatherClient, GoogleWeatherError};

pub use server::envelope::Envelope;
pub use server::{router, AppState};

use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BomError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode response body from {0}")]
    BodyDecode(String, #[source] reqwest::Error),

    // The observation feed must carry `observations.data`.
    #[error("Invalid weather data format")]
    InvalidObservationFormat,

    #[error("Failed to parse forecast XML")]
    ForecastXml(#[from] quick_xml::Error),

    #[error("Failed to parse warnings feed")]
    FeedXml(#[source] quick_xml::Error),

    #[error("No header line found in historical CSV")]
    CsvHeaderNotFound,

    #[error("Historical CSV has no 'Date' column")]
    CsvDateColumnMissing,

    #[error("Failed to parse historical CSV data")]
    CsvRead(#[source] PolarsError),

    #[error("Failed processing historical DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

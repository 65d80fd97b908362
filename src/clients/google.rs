//! Client for the commercial (Google) weather API.
//!
//! Thin pass-through: each lookup is one GET keyed by the configured API key,
//! returning the raw JSON payload. A missing key is a typed error rather than
//! a sentinel payload, so callers cannot mistake it for data.

use serde_json::Value;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://weather.googleapis.com/v1/";

#[derive(Debug, Error)]
pub enum GoogleWeatherError {
    #[error("GOOGLE_API_KEY not set in environment")]
    MissingApiKey,

    // Endpoint names only: full URLs carry the API key.
    #[error("Network request failed for Google Weather {endpoint}")]
    NetworkRequest {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Google Weather {endpoint} request failed with status {status}")]
    HttpStatus {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode Google Weather {endpoint} response")]
    BodyDecode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone)]
pub struct GoogleWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleWeatherClient {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
        }
    }

    /// Current conditions lookup.
    pub async fn conditions(&self, lat: f64, lon: f64) -> Result<Value, GoogleWeatherError> {
        self.lookup("currentConditions:lookup", lat, lon).await
    }

    /// Hourly forecast lookup.
    pub async fn hourly_forecast(&self, lat: f64, lon: f64) -> Result<Value, GoogleWeatherError> {
        self.lookup("forecast/hours:lookup", lat, lon).await
    }

    /// Daily forecast lookup.
    pub async fn daily_forecast(&self, lat: f64, lon: f64) -> Result<Value, GoogleWeatherError> {
        self.lookup("forecast/days:lookup", lat, lon).await
    }

    /// Historical hourly lookup.
    pub async fn history(&self, lat: f64, lon: f64) -> Result<Value, GoogleWeatherError> {
        self.lookup("history/hours:lookup", lat, lon).await
    }

    async fn lookup(
        &self,
        endpoint: &'static str,
        lat: f64,
        lon: f64,
    ) -> Result<Value, GoogleWeatherError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GoogleWeatherError::MissingApiKey)?;
        let url = format!(
            "{}{}?key={}&location.latitude={}&location.longitude={}",
            self.base_url, endpoint, api_key, lat, lon
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| GoogleWeatherError::NetworkRequest { endpoint, source })?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(source) => {
                return Err(if let Some(status) = source.status() {
                    GoogleWeatherError::HttpStatus {
                        endpoint,
                        status,
                        source,
                    }
                } else {
                    GoogleWeatherError::NetworkRequest { endpoint, source }
                });
            }
        };
        response
            .json()
            .await
            .map_err(|source| GoogleWeatherError::BodyDecode { endpoint, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_is_a_typed_error() {
        let client = GoogleWeatherClient::new(None, None);
        let err = client.conditions(-31.95, 115.86).await.unwrap_err();
        assert!(matches!(err, GoogleWeatherError::MissingApiKey));
        assert_eq!(err.to_string(), "GOOGLE_API_KEY not set in environment");
    }
}

//! Client for the external digital-twin flood-risk service.
//!
//! The risk computation itself lives entirely in that service; this client
//! POSTs coordinates (or a user issue report) and returns the raw JSON body.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigitalTwinError {
    #[error("DT_BASE_URL is not configured")]
    MissingBaseUrl,

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
}

/// A user-submitted issue report, forwarded verbatim to the digital twin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueReport {
    pub issue_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: HashMap<String, f64>,
    pub user: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct RiskPayload {
    lat: f64,
    lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rainfall_event_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DigitalTwinClient {
    http: reqwest::Client,
    base_url: Option<String>,
    api_token: Option<String>,
}

impl DigitalTwinClient {
    pub fn new(base_url: Option<String>, api_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_token,
        }
    }

    /// Point flood-risk lookup for a coordinate and optional rainfall event
    /// scenario (e.g. `design_2yr`).
    pub async fn risk(
        &self,
        lat: f64,
        lon: f64,
        rainfall_event_id: Option<String>,
    ) -> Result<Value, DigitalTwinError> {
        let payload = RiskPayload {
            lat,
            lon,
            rainfall_event_id,
        };
        self.post("risk/point", &payload).await
    }

    /// Forwards a user issue report to the digital twin.
    pub async fn report(&self, report: &IssueReport) -> Result<Value, DigitalTwinError> {
        self.post("report", report).await
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Value, DigitalTwinError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(DigitalTwinError::MissingBaseUrl)?;
        let url = format!("{base_url}{path}");

        let mut request = self.http.post(&url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| DigitalTwinError::NetworkRequest(url.clone(), e))?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    DigitalTwinError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    DigitalTwinError::NetworkRequest(url, e)
                });
            }
        };
        response
            .json()
            .await
            .map_err(|e| DigitalTwinError::BodyDecode(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_base_url_is_a_typed_error() {
        let client = DigitalTwinClient::new(None, Some("token".to_string()));
        let err = client.risk(-31.84, 115.89, None).await.unwrap_err();
        assert!(matches!(err, DigitalTwinError::MissingBaseUrl));
    }

    #[test]
    fn rainfall_event_id_is_omitted_when_absent() {
        let payload = RiskPayload {
            lat: -31.84,
            lon: 115.89,
            rainfall_event_id: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("rainfall_event_id").is_none());
    }
}

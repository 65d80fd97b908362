//! HTTP client for the Bureau of Meteorology's public feeds.
//!
//! All BOM endpoints sit behind bot protection that rejects requests without a
//! browser-like `User-Agent`, so every fetch here sends one. Responses are
//! returned as raw bodies (JSON value or text); parsing lives in the sibling
//! modules.

use crate::bom::error::BomError;
use crate::stations::directory::Station;
use log::info;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;

/// WA seven-day district forecast product.
const FORECAST_XML_URL: &str = "http://www.bom.gov.au/fwo/IDW14199.xml";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const FEED_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default)]
pub struct BomClient {
    http: Client,
}

impl BomClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    /// Fetches the latest observations for a station and returns the entries
    /// under `observations.data`. A response without that shape is an error.
    pub async fn fetch_observation(
        &self,
        station: &Station,
    ) -> Result<Vec<Map<String, Value>>, BomError> {
        let url = &station.observation_url;
        let response = self
            .http
            .get(url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| BomError::NetworkRequest(url.clone(), e))?;
        let response = check_status(response, url)?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| BomError::BodyDecode(url.clone(), e))?;

        let data = body
            .get("observations")
            .and_then(|o| o.get("data"))
            .and_then(Value::as_array)
            .ok_or(BomError::InvalidObservationFormat)?;
        Ok(data
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect())
    }

    /// Fetches the raw WA forecast XML document.
    pub async fn fetch_forecast_xml(&self) -> Result<String, BomError> {
        let url = FORECAST_XML_URL;
        let response = self
            .http
            .get(url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Encoding", "gzip, deflate")
            .send()
            .await
            .map_err(|e| BomError::NetworkRequest(url.to_string(), e))?;
        let response = check_status(response, url)?;
        response
            .text()
            .await
            .map_err(|e| BomError::BodyDecode(url.to_string(), e))
    }

    /// Fetches one of the warnings feed URLs. Used by the multi-URL fallback
    /// in [`crate::bom::warnings`].
    pub async fn fetch_feed(&self, url: &str) -> Result<String, BomError> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", FEED_USER_AGENT)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| BomError::NetworkRequest(url.to_string(), e))?;
        let response = check_status(response, url)?;
        response
            .text()
            .await
            .map_err(|e| BomError::BodyDecode(url.to_string(), e))
    }

    /// Fetches a warning's HTML detail page.
    pub async fn fetch_detail_page(&self, url: &str) -> Result<String, BomError> {
        info!("Fetching warning detail page {url}");
        self.fetch_feed(url).await
    }

    /// Fetches one month of historical CSV. Short explicit timeout: a slow
    /// month should not stall the whole multi-month aggregation.
    pub async fn fetch_history_csv(&self, url: &str) -> Result<String, BomError> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept", "text/csv,application/csv,text/plain,*/*")
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| BomError::NetworkRequest(url.to_string(), e))?;
        let response = check_status(response, url)?;
        response
            .text()
            .await
            .map_err(|e| BomError::BodyDecode(url.to_string(), e))
    }
}

fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response, BomError> {
    match response.error_for_status() {
        Ok(resp) => Ok(resp),
        Err(e) => {
            if let Some(status) = e.status() {
                Err(BomError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e,
                })
            } else {
                Err(BomError::NetworkRequest(url.to_string(), e))
            }
        }
    }
}

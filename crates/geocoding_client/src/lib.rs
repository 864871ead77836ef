//! Open-Meteo geocoding API client.
//!
//! Resolves a place name to a coordinate via `geocoding-api.open-meteo.com`.

use common::{Error, GeoPlace, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://geocoding-api.open-meteo.com";
const USER_AGENT: &str = "weather-station/0.1 (observation service)";

/// Search response envelope; `results` is absent entirely when nothing
/// matched the query.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<GeoPlace>,
}

/// Geocoding API client with connection pooling and a bounded timeout.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodingClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build geocoding HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Point the client at a different host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve `name` to the best-matching place.
    ///
    /// An empty result list is an error: the caller treats it like any other
    /// failed resolution and skips the cycle.
    pub async fn resolve(&self, name: &str) -> Result<GeoPlace> {
        let url = format!("{}/v1/search", self.base_url);

        debug!("Resolving coordinates for {}", name);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("name", name),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("HTTP error for {}: {}", name, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Geocoding(format!(
                "geocoding returned {} for {}: {}",
                status,
                name,
                &body[..body.len().min(500)]
            )));
        }

        let data: SearchResponse = resp
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("JSON parse error for {}: {}", name, e)))?;

        let place = data
            .results
            .into_iter()
            .next()
            .ok_or_else(|| Error::Geocoding(format!("no geocoding results for {}", name)))?;

        debug!(
            "Resolved {} to {}, {} ({}, {})",
            name, place.name, place.country, place.latitude, place.longitude
        );

        Ok(place)
    }
}

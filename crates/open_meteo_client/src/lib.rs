//! Open-Meteo forecast API client.
//!
//! Fetches the current temperature for a coordinate from
//! `api.open-meteo.com`.

use common::{CurrentWeather, Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
const USER_AGENT: &str = "weather-station/0.1 (observation service)";

/// Forecast response envelope. Only the `current` block is consumed.
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentWeather,
}

/// Forecast API client with connection pooling and a bounded timeout.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build forecast HTTP client: {}", e)))?;

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

    /// Fetch the current temperature observation at a coordinate.
    ///
    /// The observation timestamp comes back as the raw naive string from the
    /// API; parsing it is the caller's concern.
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentWeather> {
        let url = format!("{}/v1/forecast", self.base_url);

        debug!("Fetching current weather for ({}, {})", lat, lon);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", "temperature_2m".to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::OpenMeteo(format!("HTTP error for ({}, {}): {}", lat, lon, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::OpenMeteo(format!(
                "forecast API returned {} for ({}, {}): {}",
                status,
                lat,
                lon,
                &body[..body.len().min(500)]
            )));
        }

        let data: ForecastResponse = resp.json().await.map_err(|e| {
            Error::OpenMeteo(format!("JSON parse error for ({}, {}): {}", lat, lon, e))
        })?;

        debug!(
            "Current weather at ({}, {}): {}° at {}",
            lat, lon, data.current.temperature_2m, data.current.time
        );

        Ok(data.current)
    }
}

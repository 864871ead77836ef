//! Service configuration types.

use serde::{Deserialize, Serialize};

use crate::types::normalize_key;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Place to track, handed verbatim to the geocoding API.
    #[serde(default = "default_city")]
    pub city: String,

    /// Seconds between refresh cycles.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Port the query endpoint listens on.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Timeout for each outbound API call (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Seconds between heartbeat log lines.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
}

impl Config {
    /// The store key for the configured city.
    pub fn location_key(&self) -> String {
        normalize_key(&self.city)
    }
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_city() -> String {
    "moscow".into()
}

fn default_refresh_interval() -> u64 {
    10
}

fn default_http_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    10
}

fn default_heartbeat_interval() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city: default_city(),
            refresh_interval_secs: default_refresh_interval(),
            http_port: default_http_port(),
            request_timeout_secs: default_request_timeout(),
            heartbeat_interval_secs: default_heartbeat_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.city, "moscow");
        assert_eq!(config.refresh_interval_secs, 10);
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_location_key_normalizes_city() {
        let config = Config {
            city: " Moscow ".into(),
            ..Config::default()
        };
        assert_eq!(config.location_key(), "moscow");
    }
}

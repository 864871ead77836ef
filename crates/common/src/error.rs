//! Unified error type for the weather station.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Geocoding API error: {0}")]
    Geocoding(String),

    #[error("Open-Meteo API error: {0}")]
    OpenMeteo(String),

    #[error("Timestamp parse error: {0}")]
    TimestampParse(#[from] chrono::format::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

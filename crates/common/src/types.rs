//! Domain types shared across the service.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wire layout of observation timestamps, e.g. `2025-11-09T06:00`.
///
/// Open-Meteo reports current-weather time as a local naive date-time with
/// minute precision; readings must be parsed with exactly this pattern and
/// are serialized back with it unchanged.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// One temperature observation. Immutable once produced by a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(with = "naive_minute")]
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// A resolved place: display name, country, and coordinate.
///
/// Matches one entry of the geocoding API's `results` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoPlace {
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Current-weather block as returned by the forecast API.
///
/// `time` is kept as the raw naive string; the refresh cycle owns parsing so
/// a malformed timestamp fails the cycle rather than the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub time: String,
    pub temperature_2m: f64,
}

/// Normalize a place name into a store key.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Serde helper for `YYYY-MM-DDTHH:MM` timestamps.
pub mod naive_minute {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_serializes_with_minute_timestamp() {
        let reading = Reading {
            timestamp: NaiveDateTime::parse_from_str("2025-11-09T06:00", TIMESTAMP_FORMAT)
                .expect("valid timestamp"),
            value: 3.5,
        };

        let json = serde_json::to_string(&reading).expect("reading should serialize");
        assert_eq!(json, r#"{"timestamp":"2025-11-09T06:00","value":3.5}"#);
    }

    #[test]
    fn test_reading_roundtrip() {
        let json = r#"{"timestamp":"2025-11-09T06:00","value":-7.25}"#;
        let reading: Reading = serde_json::from_str(json).expect("reading should deserialize");

        assert_eq!(reading.value, -7.25);
        assert_eq!(
            serde_json::to_string(&reading).expect("reading should serialize"),
            json
        );
    }

    #[test]
    fn test_reading_rejects_second_precision() {
        let json = r#"{"timestamp":"2025-11-09T06:00:00","value":3.5}"#;
        assert!(serde_json::from_str::<Reading>(json).is_err());
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Moscow "), "moscow");
        assert_eq!(normalize_key("NEW YORK"), "new york");
    }
}

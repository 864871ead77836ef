//! Configuration loader — merges env vars, .env file, and config.toml.

use common::{Config, Error};
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{} must be an integer > 0", env_name)))?;
    if parsed == 0 {
        return Err(Error::Config(format!(
            "{} must be an integer > 0",
            env_name
        )));
    }
    Ok(parsed)
}

fn parse_port(raw: &str, env_name: &str) -> Result<u16, Error> {
    let parsed = raw
        .trim()
        .parse::<u16>()
        .map_err(|_| Error::Config(format!("{} must be a port number", env_name)))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{} must be a port number", env_name)));
    }
    Ok(parsed)
}

fn validate_config(config: &Config) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.city.trim().is_empty() {
        issues.push("city must not be empty".into());
    }
    if config.refresh_interval_secs == 0 {
        issues.push("refresh_interval_secs must be > 0".into());
    }
    if config.http_port == 0 {
        issues.push("http_port must be > 0".into());
    }
    if config.request_timeout_secs == 0 {
        issues.push("request_timeout_secs must be > 0".into());
    }
    if config.heartbeat_interval_secs == 0 {
        issues.push("heartbeat_interval_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load service configuration from environment and optional config file.
pub fn load_config() -> Result<Config, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = Config::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(city) = std::env::var("WEATHER_CITY") {
        config.city = city;
    }
    if let Ok(raw) = std::env::var("WEATHER_REFRESH_INTERVAL_SECS") {
        config.refresh_interval_secs = parse_positive_u64(&raw, "WEATHER_REFRESH_INTERVAL_SECS")?;
    }
    if let Ok(raw) = std::env::var("WEATHER_HTTP_PORT") {
        config.http_port = parse_port(&raw, "WEATHER_HTTP_PORT")?;
    }
    if let Ok(raw) = std::env::var("WEATHER_REQUEST_TIMEOUT_SECS") {
        config.request_timeout_secs = parse_positive_u64(&raw, "WEATHER_REQUEST_TIMEOUT_SECS")?;
    }
    if let Ok(raw) = std::env::var("WEATHER_HEARTBEAT_INTERVAL_SECS") {
        config.heartbeat_interval_secs = parse_positive_u64(&raw, "WEATHER_HEARTBEAT_INTERVAL_SECS")?;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}

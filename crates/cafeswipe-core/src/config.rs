use std::env::VarError;
use std::str::FromStr;

use crate::app_config::{AppConfig, ClientConfig, Environment};
use crate::ConfigError;

/// Load relay configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if `PLACES_KEY` is missing or a value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load relay configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if `PLACES_KEY` is missing or a value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load terminal client configuration, including any `.env` file.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric value cannot be parsed.
pub fn load_client_config() -> Result<ClientConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_client_config(|key| std::env::var(key))
}

/// Reads `var` through `lookup`, falling back to `default`, and parses it.
fn parse_or<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Core relay config parsing, decoupled from the process environment so it
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let places_api_key = lookup("PLACES_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar("PLACES_KEY".to_string()))?;

    let env = parse_environment(&or_default("CAFESWIPE_ENV", "development"))?;
    let bind_addr = parse_or(&lookup, "CAFESWIPE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CAFESWIPE_LOG_LEVEL", "info");
    let static_dir = or_default("CAFESWIPE_STATIC_DIR", "./public").into();
    let places_base_url = or_default(
        "CAFESWIPE_PLACES_BASE_URL",
        "https://places.googleapis.com/v1/",
    );
    let places_timeout_secs = parse_or(&lookup, "CAFESWIPE_PLACES_TIMEOUT_SECS", "30")?;
    let photo_max_width_px = parse_or(&lookup, "CAFESWIPE_PHOTO_MAX_WIDTH_PX", "400")?;
    let user_agent = or_default("CAFESWIPE_USER_AGENT", "cafeswipe/0.1 (places-relay)");

    Ok(AppConfig {
        places_api_key,
        env,
        bind_addr,
        log_level,
        static_dir,
        places_base_url,
        places_timeout_secs,
        photo_max_width_px,
        user_agent,
    })
}

fn build_client_config<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let relay_url = or_default("CAFESWIPE_RELAY_URL", "http://localhost:3000");
    let saved_path = or_default("CAFESWIPE_SAVED_PATH", "./saved_cafes.json").into();
    let search_radius_m = parse_or(&lookup, "CAFESWIPE_SEARCH_RADIUS_M", "4500")?;
    let place_type = or_default("CAFESWIPE_PLACE_TYPE", "cafe");
    let max_results = parse_or(&lookup, "CAFESWIPE_MAX_RESULTS", "20")?;
    let timeout_secs = parse_or(&lookup, "CAFESWIPE_CLIENT_TIMEOUT_SECS", "15")?;
    let log_level = or_default("CAFESWIPE_LOG_LEVEL", "warn");

    Ok(ClientConfig {
        relay_url,
        saved_path,
        search_radius_m,
        place_type,
        max_results,
        timeout_secs,
        log_level,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CAFESWIPE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

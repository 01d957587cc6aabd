use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the real environment so it
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("NMCOAST_ENV", "development"));
    let bind_addr = parse_addr("NMCOAST_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("NMCOAST_LOG_LEVEL", "info");

    // The upstream default is the development mock API.
    let api_base_url = or_default("NMCOAST_API_BASE_URL", "http://127.0.0.1:8000");
    let geocoder_base_url = or_default(
        "NMCOAST_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let dashboard_url = or_default(
        "NMCOAST_DASHBOARD_URL",
        "http://127.0.0.1:8088/dashboard/counters",
    );

    let request_timeout_secs = parse_u64("NMCOAST_REQUEST_TIMEOUT_SECS", "30")?;
    let search_debounce_ms = parse_u64("NMCOAST_SEARCH_DEBOUNCE_MS", "300")?;
    let search_pin_ttl_secs = parse_u64("NMCOAST_SEARCH_PIN_TTL_SECS", "10")?;
    let max_concurrent_count_fetches = parse_usize("NMCOAST_MAX_CONCURRENT_COUNT_FETCHES", "8")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_base_url,
        geocoder_base_url,
        dashboard_url,
        request_timeout_secs,
        search_debounce_ms,
        search_pin_ttl_secs,
        max_concurrent_count_fetches,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

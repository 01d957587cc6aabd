use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration, loaded from `NMCOAST_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Base URL of the counts REST API.
    pub api_base_url: String,
    /// Base URL of the Nominatim-compatible geocoder.
    pub geocoder_base_url: String,
    /// Base URL of the downstream dashboard used for marker deep links.
    pub dashboard_url: String,
    pub request_timeout_secs: u64,
    /// Delay between the last keystroke and search evaluation.
    pub search_debounce_ms: u64,
    /// Lifetime of the temporary pin placed for an address lookup.
    pub search_pin_ttl_secs: u64,
    /// Upper bound on simultaneous per-datastream count fetches.
    pub max_concurrent_count_fetches: usize,
}

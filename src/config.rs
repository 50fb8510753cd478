use crate::error::{AppError, Result};

pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Max in-flight upstream requests during a fan-out (catalog scans, rosters).
/// PokeAPI is a free public service; keep this polite.
pub const FETCH_CONCURRENCY: usize = 16;

/// Default page size for the legendary and region list endpoints.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Default result count for /pokemon/top.
pub const DEFAULT_TOP_LIMIT: u32 = 10;

/// Default result count for /pokemon/region/{region}/top.
pub const DEFAULT_REGIONAL_TOP_LIMIT: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub pokeapi_base_url: String,
    pub log_level: String,
    pub api_port: u16,
    /// Per-request timeout against the upstream API in seconds (FETCH_TIMEOUT_SECS).
    /// Expiry is reported as an upstream failure, never retried.
    pub fetch_timeout_secs: u64,
    /// Upper bound of the national dex id range scanned by the legendary and
    /// top-by-power endpoints (CATALOG_LIMIT). 151 covers the original dex.
    pub catalog_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            pokeapi_base_url: std::env::var("POKEAPI_BASE_URL")
                .unwrap_or_else(|_| POKEAPI_BASE_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .unwrap_or(10),
            catalog_limit: std::env::var("CATALOG_LIMIT")
                .unwrap_or_else(|_| "151".to_string())
                .parse::<u32>()
                .unwrap_or(151),
        })
    }
}

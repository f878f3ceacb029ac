//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Default upstream root for the GameSpot API.
pub const DEFAULT_GAMESPOT_BASE_URL: &str = "https://www.gamespot.com/api";

/// Default User-Agent sent upstream. GameSpot rejects anonymous clients.
pub const DEFAULT_USER_AGENT: &str = "GameStoreBackend/1.0 (storefront catalog proxy)";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// GameSpot API key, None disables the catalog proxy
    pub gamespot_api_key: Option<String>,
    /// Root URL of the GameSpot API
    pub gamespot_base_url: String,
    /// User-Agent header for outbound requests
    pub upstream_user_agent: String,
    /// Outbound request timeout in seconds
    pub upstream_timeout: u64,
    /// TTL in seconds for cached upstream responses
    pub cache_ttl: u64,
    /// Path of the flat-file JSON datastore
    pub db_path: PathBuf,
    /// Requests per minute allowed per client IP on `/api/*`
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 4000)
    /// - `GAMESPOT_API_KEY` - upstream credential (default: unset)
    /// - `GAMESPOT_BASE_URL` - upstream root (default: GameSpot production API)
    /// - `UPSTREAM_USER_AGENT` - outbound User-Agent
    /// - `UPSTREAM_TIMEOUT_SECONDS` - outbound timeout (default: 30)
    /// - `CACHE_TTL_SECONDS` - cache TTL (default: 300)
    /// - `DB_PATH` - datastore file (default: db.json)
    /// - `RATE_LIMIT_PER_MINUTE` - per-IP ceiling (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parsed_var("PORT").unwrap_or(defaults.server_port),
            gamespot_api_key: non_empty_var("GAMESPOT_API_KEY"),
            gamespot_base_url: non_empty_var("GAMESPOT_BASE_URL")
                .unwrap_or(defaults.gamespot_base_url),
            upstream_user_agent: non_empty_var("UPSTREAM_USER_AGENT")
                .unwrap_or(defaults.upstream_user_agent),
            upstream_timeout: parsed_var("UPSTREAM_TIMEOUT_SECONDS")
                .unwrap_or(defaults.upstream_timeout),
            cache_ttl: parsed_var("CACHE_TTL_SECONDS").unwrap_or(defaults.cache_ttl),
            db_path: non_empty_var("DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            rate_limit_per_minute: parsed_var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or(defaults.rate_limit_per_minute),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 4000,
            gamespot_api_key: None,
            gamespot_base_url: DEFAULT_GAMESPOT_BASE_URL.to_string(),
            upstream_user_agent: DEFAULT_USER_AGENT.to_string(),
            upstream_timeout: 30,
            cache_ttl: 300,
            db_path: PathBuf::from("db.json"),
            rate_limit_per_minute: 100,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

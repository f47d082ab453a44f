//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default cache TTL in seconds
    pub default_ttl: u64,
    /// Hard cap on in-memory cache entries
    pub cache_max_entries: usize,
    /// Size the in-memory cache trims back to once the cap is reached
    pub cache_trim_target: usize,
    /// Cache expiry sweep interval in seconds
    pub cache_cleanup_interval: u64,
    /// Rate limiter window/blacklist sweep interval in seconds
    pub limiter_cleanup_interval: u64,
    /// Application prefix for all cache keys
    pub key_prefix: String,
    /// Budget in milliseconds for each remote backend call
    pub remote_timeout_ms: u64,
    /// Per-IP quota for unauthenticated endpoints (requests per minute)
    pub ip_requests_per_minute: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL` - Default cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - In-memory entry cap (default: 1000)
    /// - `CACHE_TRIM_TARGET` - Post-trim size (default: 800)
    /// - `CACHE_CLEANUP_INTERVAL` - Cache sweep interval in seconds (default: 60)
    /// - `LIMITER_CLEANUP_INTERVAL` - Limiter sweep interval in seconds (default: 300)
    /// - `CACHE_KEY_PREFIX` - Key prefix (default: "fundadmin")
    /// - `REMOTE_TIMEOUT_MS` - Remote backend call budget (default: 150)
    /// - `IP_REQUESTS_PER_MINUTE` - Unauthenticated per-IP quota (default: 10)
    pub fn from_env() -> Self {
        Self {
            server_port: env_or("SERVER_PORT", 3000),
            default_ttl: env_or("DEFAULT_TTL", 300),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", 1000),
            cache_trim_target: env_or("CACHE_TRIM_TARGET", 800),
            cache_cleanup_interval: env_or("CACHE_CLEANUP_INTERVAL", 60),
            limiter_cleanup_interval: env_or("LIMITER_CLEANUP_INTERVAL", 300),
            key_prefix: env::var("CACHE_KEY_PREFIX").unwrap_or_else(|_| "fundadmin".to_string()),
            remote_timeout_ms: env_or("REMOTE_TIMEOUT_MS", 150),
            ip_requests_per_minute: env_or("IP_REQUESTS_PER_MINUTE", 10),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_ttl: 300,
            cache_max_entries: 1000,
            cache_trim_target: 800,
            cache_cleanup_interval: 60,
            limiter_cleanup_interval: 300,
            key_prefix: "fundadmin".to_string(),
            remote_timeout_ms: 150,
            ip_requests_per_minute: 10,
        }
    }
}

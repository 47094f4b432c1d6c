//! Configuration Module
//!
//! Loads cache settings from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Turn a config into a cache with
/// [`LruCache::from_config`](crate::LruCache::from_config); the values are
/// validated there, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Cache-wide TTL in milliseconds, 0 = entries never expire
    pub ttl_ms: u64,
    /// Number of expiry sweeps per TTL period
    pub ttl_ticks: u32,
    /// Check expiration inline on every touch instead of relying on sweeps
    pub strict_expiry: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset or unparsable variables fall back to their default.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_MS` - TTL in milliseconds, 0 disables it (default: 0)
    /// - `CACHE_TTL_TICKS` - Sweeps per TTL period (default: 4)
    /// - `CACHE_STRICT_EXPIRY` - `true` to hide expired entries on read (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            ttl_ms: parse_var("CACHE_TTL_MS").unwrap_or(defaults.ttl_ms),
            ttl_ticks: parse_var("CACHE_TTL_TICKS").unwrap_or(defaults.ttl_ticks),
            strict_expiry: parse_var("CACHE_STRICT_EXPIRY").unwrap_or(defaults.strict_expiry),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl_ms: 0,
            ttl_ticks: 4,
            strict_expiry: false,
        }
    }
}

//! LRU TTL Cache - A fixed-capacity in-memory cache
//!
//! Least-recently-used eviction, an optional cache-wide TTL refreshed on every
//! touch, and a background sweeper that removes expired entries.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheBuilder, CacheStats, CacheStore, ExpiryMode, LruCache};
pub use config::Config;
pub use error::{CacheError, Result};

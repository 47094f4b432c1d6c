//! Cache Module
//!
//! Provides in-memory caching with LRU eviction and TTL expiration.

mod builder;
mod entry;
mod lru;
mod lru_cache;
mod options;
mod stats;
mod store;
mod traits;


// Re-export public types
pub use builder::CacheBuilder;
pub use entry::CacheEntry;
pub use lru::LruList;
pub use lru_cache::LruCache;
pub use options::{ExpiryMode, TtlConfig};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use traits::Cache;

pub(crate) use lru_cache::{lock_state, CacheState, SharedState};

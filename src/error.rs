//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while constructing a cache.
///
/// Once a cache exists, `set`, `get` and `clear` cannot fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be a positive number of entries
    #[error("Invalid capacity: {0} (must be positive)")]
    InvalidCapacity(usize),

    /// TTL or tick count rejected
    #[error("Invalid TTL config: {0}")]
    InvalidTtlConfig(String),

    /// TTL requested but no tokio runtime is available to run the sweeper
    #[error("No tokio runtime available to run the expiry sweeper")]
    RuntimeUnavailable,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

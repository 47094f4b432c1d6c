//! Cache Builder Module
//!
//! Collects construction options and validates all of them before anything
//! is allocated or spawned.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use crate::cache::{CacheStore, ExpiryMode, LruCache, TtlConfig};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache Builder ==
/// Builder for [`LruCache`].
///
/// # Example
/// ```
/// use std::time::Duration;
/// use lru_ttl_cache::{CacheError, LruCache};
///
/// let result = LruCache::<String, u32>::builder(16)
///     .with_ttl(Duration::from_secs(30), 1)
///     .build();
/// assert!(matches!(result, Err(CacheError::InvalidTtlConfig(_))));
/// ```
pub struct CacheBuilder<K, V> {
    capacity: usize,
    ttl: Option<(Duration, u32)>,
    expiry_mode: ExpiryMode,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> CacheBuilder<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ttl: None,
            expiry_mode: ExpiryMode::default(),
            _marker: PhantomData,
        }
    }

    /// Enables a cache-wide TTL, swept `ticks` times per TTL period.
    ///
    /// Validated by [`build`](Self::build): `ttl` must be positive and
    /// `ticks` at least 2.
    pub fn with_ttl(mut self, ttl: Duration, ticks: u32) -> Self {
        self.ttl = Some((ttl, ticks));
        self
    }

    pub fn expiry_mode(mut self, expiry_mode: ExpiryMode) -> Self {
        self.expiry_mode = expiry_mode;
        self
    }
}

impl<K, V> CacheBuilder<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    /// Validates the options and creates the cache.
    ///
    /// With a TTL, the sweeper is spawned on the current tokio runtime.
    ///
    /// # Errors
    /// - `InvalidCapacity` when capacity is zero
    /// - `InvalidTtlConfig` when the TTL or tick count is rejected
    /// - `RuntimeUnavailable` when a TTL is set outside a tokio runtime
    pub fn build(self) -> Result<LruCache<K, V>> {
        let store = CacheStore::new(self.capacity)?.with_expiry_mode(self.expiry_mode);

        let sweep = match self.ttl {
            Some((ttl, ticks)) => {
                let config = TtlConfig::new(ttl, ticks)?;
                let runtime = Handle::try_current().map_err(|_| CacheError::RuntimeUnavailable)?;
                Some((config, runtime))
            }
            None => None,
        };

        let store = match &sweep {
            Some((config, _)) => store.with_ttl(config.ttl()),
            None => store,
        };

        debug!(
            capacity = self.capacity,
            ttl = ?sweep.as_ref().map(|(config, _)| config.ttl()),
            ticks = sweep.as_ref().map(|(config, _)| config.ticks()),
            expiry_mode = ?self.expiry_mode,
            "Creating LRU cache"
        );

        Ok(LruCache::start(store, sweep))
    }
}

impl<K, V> From<&Config> for CacheBuilder<K, V> {
    fn from(config: &Config) -> Self {
        let builder = Self::new(config.capacity).expiry_mode(if config.strict_expiry {
            ExpiryMode::Strict
        } else {
            ExpiryMode::Lazy
        });

        match config.ttl_ms {
            0 => builder,
            ttl_ms => builder.with_ttl(Duration::from_millis(ttl_ms), config.ttl_ticks),
        }
    }
}

impl<K, V> fmt::Debug for CacheBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("expiry_mode", &self.expiry_mode)
            .finish()
    }
}

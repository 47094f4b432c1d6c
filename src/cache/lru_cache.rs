//! Shared LRU Cache Module
//!
//! Thread-safe cache handle: one mutex guards the store together with the
//! sweeper handle, so every `set`, `get`, `clear` and sweep tick runs as a
//! single critical section.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use crate::cache::{CacheBuilder, CacheStats, CacheStore, TtlConfig};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::{spawn_sweeper, SweeperHandle};

// == Shared State ==
/// Everything the cache lock protects.
#[derive(Debug)]
pub(crate) struct CacheState<K, V> {
    pub(crate) store: CacheStore<K, V>,
    sweeper: Option<SweeperHandle>,
}

impl<K, V> CacheState<K, V> {
    pub(crate) fn new(store: CacheStore<K, V>) -> Self {
        Self {
            store,
            sweeper: None,
        }
    }

    /// Cancels and forgets the sweeper, if any.
    fn stop_sweeper(&mut self) -> bool {
        match self.sweeper.take() {
            Some(sweeper) => {
                sweeper.cancel();
                true
            }
            None => false,
        }
    }
}

pub(crate) type SharedState<K, V> = Mutex<CacheState<K, V>>;

/// Locks the cache state.
///
/// A panic while the lock was held cannot leave the store half-updated, so a
/// poisoned lock is recovered rather than propagated.
pub(crate) fn lock_state<K, V>(state: &SharedState<K, V>) -> MutexGuard<'_, CacheState<K, V>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// == LRU Cache ==
/// A fixed-capacity LRU cache with an optional cache-wide TTL, safe to share
/// between threads.
///
/// When built with a TTL, a background sweeper runs on the tokio runtime that
/// was current at construction. It is stopped by [`clear`](Self::clear),
/// [`shutdown`](Self::shutdown), or dropping the cache.
///
/// # Example
/// ```
/// use lru_ttl_cache::LruCache;
///
/// let cache = LruCache::new(2).unwrap();
/// assert!(!cache.set("A", 1));
/// assert!(!cache.set("B", 2));
/// assert!(!cache.set("C", 3)); // evicts A
///
/// assert_eq!(cache.get("A"), None);
/// assert_eq!(cache.get("B"), Some(2));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V> {
    state: Arc<SharedState<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    // == Constructors ==
    /// Creates a cache without TTL.
    ///
    /// # Errors
    /// `InvalidCapacity` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        CacheBuilder::new(capacity).build()
    }

    /// Creates a cache from environment-style configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        CacheBuilder::from(config).build()
    }

    /// Wraps a validated store, starting the sweeper when one is requested.
    pub(crate) fn start(store: CacheStore<K, V>, sweep: Option<(TtlConfig, Handle)>) -> Self {
        let state = Arc::new(Mutex::new(CacheState::new(store)));

        if let Some((ttl, runtime)) = sweep {
            let sweeper = spawn_sweeper(&runtime, Arc::downgrade(&state), ttl.sweep_period());
            lock_state(&state).sweeper = Some(sweeper);
        }

        Self { state }
    }
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Starts a builder for a cache holding at most `capacity` entries.
    pub fn builder(capacity: usize) -> CacheBuilder<K, V> {
        CacheBuilder::new(capacity)
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<K, V>> {
        lock_state(&self.state)
    }

    // == Set ==
    /// Stores a value, evicting the least recently used entry if full.
    ///
    /// Returns `true` if an existing entry was updated, `false` if a new one
    /// was added.
    pub fn set(&self, key: K, value: V) -> bool {
        self.lock().store.set(key, value)
    }

    // == Get ==
    /// Returns a clone of the value and marks the key most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.lock().store.get(key).cloned()
    }

    /// Removes a key, returning its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().store.remove(key)
    }

    // == Clear ==
    /// Stops the sweeper, disables TTL and drops every entry.
    ///
    /// Entries set afterwards never expire.
    pub fn clear(&self) {
        let mut state = self.lock();
        let stopped = state.stop_sweeper();
        state.store.disable_ttl();
        state.store.clear();
        debug!(sweeper_stopped = stopped, "Cache cleared");
    }

    // == Shutdown ==
    /// Stops the sweeper, keeping entries and TTL stamping as they are.
    ///
    /// Expired entries are no longer removed in the background afterwards.
    pub fn shutdown(&self) {
        if self.lock().stop_sweeper() {
            debug!("Expiry sweeper shut down");
        }
    }

    /// True while a sweeper task is attached and still running.
    pub fn is_sweeping(&self) -> bool {
        self.lock()
            .sweeper
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    // == Accessors ==
    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().store.capacity()
    }

    /// Current TTL; None if never configured or after [`clear`](Self::clear).
    pub fn ttl(&self) -> Option<Duration> {
        self.lock().store.ttl()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().store.stats()
    }

    /// Snapshot of keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.lock().store.keys().cloned().collect()
    }
}

impl<K, V> Drop for LruCache<K, V> {
    fn drop(&mut self) {
        lock_state(&self.state).stop_sweeper();
    }
}

//! Cache Capability Module
//!
//! The minimal surface callers can be written against instead of a concrete
//! cache type.

use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use crate::cache::{CacheStore, LruCache};

// == Cache Trait ==
/// Set, get and clear: the capability set every cache implementation offers.
///
/// The trait is object safe, so `Box<dyn Cache<K, V>>` works.
pub trait Cache<K, V> {
    /// Stores a value. Returns `true` if an existing entry was updated.
    fn set(&self, key: K, value: V) -> bool;

    /// Returns the value for `key`, marking it most recently used.
    fn get(&self, key: &K) -> Option<V>;

    /// Drops every entry.
    fn clear(&self);
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn set(&self, key: K, value: V) -> bool {
        LruCache::set(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn clear(&self) {
        LruCache::clear(self)
    }
}

/// A plain store behind a mutex: the TTL-less variant with no background task.
impl<K, V> Cache<K, V> for Mutex<CacheStore<K, V>>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn set(&self, key: K, value: V) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set(key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn clear(&self) {
        self.lock().unwrap_or_else(PoisonError::into_inner).clear()
    }
}

impl<K, V, C> Cache<K, V> for Arc<C>
where
    C: Cache<K, V> + ?Sized,
{
    fn set(&self, key: K, value: V) -> bool {
        (**self).set(key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

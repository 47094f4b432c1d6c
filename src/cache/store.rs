//! Cache Store Module
//!
//! Main cache engine combining the recency-ordered list with capacity eviction
//! and TTL stamping. The store itself is unsynchronized; [`LruCache`] wraps it
//! in a mutex and drives its sweeps.
//!
//! [`LruCache`]: crate::cache::LruCache

use std::borrow::Borrow;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::cache::lru::Iter;
use crate::cache::{CacheEntry, CacheStats, ExpiryMode, LruList};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Fixed-capacity LRU storage with an optional cache-wide TTL.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Entries in recency order
    entries: LruList<K, V>,
    /// Counters
    stats: CacheStats,
    /// Maximum number of entries, never zero
    capacity: usize,
    /// Cache-wide TTL, None = entries never expire
    ttl: Option<Duration>,
    expiry_mode: ExpiryMode,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    ///
    /// # Errors
    /// `InvalidCapacity` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        Ok(Self {
            entries: LruList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            ttl: None,
            expiry_mode: ExpiryMode::default(),
        })
    }

    /// Stamps entries with `now + ttl` on every touch. A zero TTL disables it.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    pub fn with_expiry_mode(mut self, expiry_mode: ExpiryMode) -> Self {
        self.expiry_mode = expiry_mode;
        self
    }

    // == Set ==
    /// Stores a key-value pair and makes it the most recently used entry.
    ///
    /// If the key is new and the store is full, exactly one entry, the least
    /// recently used, is evicted first.
    ///
    /// # Returns
    /// `true` if an existing entry was updated, `false` if a new one was added.
    pub fn set(&mut self, key: K, value: V) -> bool {
        if self.expiry_mode == ExpiryMode::Strict {
            self.purge_if_expired(&key);
        }

        let ttl = self.ttl;
        if let Some(entry) = self.entries.touch(&key) {
            entry.value = value;
            entry.refresh(ttl);
            return true;
        }

        if self.entries.len() >= self.capacity && self.entries.evict_oldest().is_some() {
            self.stats.record_eviction();
            trace!(capacity = self.capacity, "Evicted least recently used entry");
        }

        self.entries.push_front(key, CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
        false
    }

    // == Get ==
    /// Retrieves a value and makes it the most recently used entry.
    ///
    /// With a TTL the entry's expiration is pushed out to `now + ttl`. In
    /// [`ExpiryMode::Lazy`] an entry that expired but was not swept yet is
    /// still returned; in [`ExpiryMode::Strict`] it is removed and missed.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.expiry_mode == ExpiryMode::Strict && self.purge_if_expired(key) {
            self.stats.record_miss();
            return None;
        }

        let ttl = self.ttl;
        match self.entries.touch(key) {
            Some(entry) => {
                entry.refresh(ttl);
                self.stats.record_hit();
                Some(&entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes an entry, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key)?;
        self.stats.set_total_entries(self.entries.len());
        Some(entry.value)
    }

    // == Clear ==
    /// Removes every entry. Counters other than the entry count are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    /// Stops stamping expirations on later touches.
    pub fn disable_ttl(&mut self) {
        self.ttl = None;
    }

    // == Sweep Expired ==
    /// Removes expired entries starting from the least recently used end.
    ///
    /// Touches refresh expirations uniformly, so the back of the list always
    /// expires first: the scan stops at the first entry still alive at `now`
    /// (or one that never expires).
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        while let Some((_, entry)) = self.entries.peek_oldest() {
            if !entry.is_expired_at(now) {
                break;
            }
            self.entries.evict_oldest();
            removed += 1;
        }

        if removed > 0 {
            self.stats.record_expirations(removed);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Accessors ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cache-wide TTL, or None when entries never expire.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn expiry_mode(&self) -> ExpiryMode {
        self.expiry_mode
    }

    /// Returns current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Entries from most to least recently used.
    pub(crate) fn entries(&self) -> Iter<'_, K, V> {
        self.entries.iter()
    }

    fn purge_if_expired<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expired = self
            .entries
            .peek(key)
            .is_some_and(|entry| entry.is_expired());
        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        expired
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> CacheStore<String, String> {
        CacheStore::new(capacity).unwrap()
    }

    fn keys(store: &CacheStore<String, String>) -> Vec<&str> {
        store.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert!(store.ttl().is_none());
        assert_eq!(store.expiry_mode(), ExpiryMode::Lazy);
    }

    #[test]
    fn test_store_zero_capacity() {
        let result = CacheStore::<String, String>::new(0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store(100);

        assert!(!store.set("key1".to_string(), "value1".to_string()));
        assert_eq!(store.get("key1").map(String::as_str), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        store.set("key1".to_string(), "value1".to_string());

        assert!(store.get("nonexistent").is_none());
        assert_eq!(keys(&store), vec!["key1"]);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store(100);

        assert!(!store.set("key1".to_string(), "value1".to_string()));
        assert!(store.set("key1".to_string(), "value2".to_string()));

        assert_eq!(store.get("key1").map(String::as_str), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_remove() {
        let mut store = store(100);
        store.set("key1".to_string(), "value1".to_string());

        assert_eq!(store.remove("key1"), Some("value1".to_string()));
        assert!(store.is_empty());
        assert!(store.remove("key1").is_none());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(2);

        assert!(!store.set("A".to_string(), "1".to_string()));
        assert!(!store.set("B".to_string(), "2".to_string()));
        // Cache is full, adding C evicts A (oldest)
        assert!(!store.set("C".to_string(), "3".to_string()));

        assert_eq!(store.len(), 2);
        assert!(store.get("A").is_none());
        assert_eq!(store.get("B").map(String::as_str), Some("2"));
        assert_eq!(store.get("C").map(String::as_str), Some("3"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store(3);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        store.set("key3".to_string(), "value3".to_string());

        // Access key1 to make it most recently used
        store.get("key1");

        // Adding key4 should evict key2 (now oldest)
        store.set("key4".to_string(), "value4".to_string());

        assert_eq!(keys(&store), vec!["key4", "key1", "key3"]);
    }

    #[test]
    fn test_store_lru_touch_on_set() {
        let mut store = store(2);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        store.set("key1".to_string(), "again".to_string());
        store.set("key3".to_string(), "value3".to_string());

        assert!(store.get("key2").is_none());
        assert_eq!(store.get("key1").map(String::as_str), Some("again"));
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(100);

        store.set("key1".to_string(), "value1".to_string());
        store.get("key1"); // hit
        store.get("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_set_stamps_expiration() {
        let mut store = store(2).with_ttl(Duration::from_secs(20));
        store.set("one".to_string(), "1".to_string());

        let (_, entry) = store.entries().next().unwrap();
        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining > Duration::ZERO);
        assert!(remaining <= Duration::from_secs(20));
    }

    #[test]
    fn test_store_zero_ttl_disables_expiration() {
        let mut store = store(2).with_ttl(Duration::ZERO);
        store.set("one".to_string(), "1".to_string());

        assert!(store.ttl().is_none());
        assert!(store.entries().all(|(_, entry)| entry.expires_at.is_none()));
    }

    #[test]
    fn test_store_unrepresentable_ttl_never_expires() {
        let mut store = store(2).with_ttl(Duration::MAX);
        store.set("one".to_string(), "1".to_string());
        store.set("one".to_string(), "2".to_string());

        assert_eq!(store.get("one"), Some(&"2".to_string()));
        assert_eq!(store.sweep_expired(Instant::now()), 0);
    }

    #[test]
    fn test_store_touch_refreshes_expiration() {
        let mut store = store(2).with_ttl(Duration::from_secs(20));
        store.set("one".to_string(), "1".to_string());
        let first = store.entries().next().unwrap().1.expires_at.unwrap();

        std::thread::sleep(Duration::from_millis(5));
        store.get("one");
        let second = store.entries().next().unwrap().1.expires_at.unwrap();

        std::thread::sleep(Duration::from_millis(5));
        assert!(store.set("one".to_string(), "ONE".to_string()));
        let third = store.entries().next().unwrap().1.expires_at.unwrap();

        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_store_sweep_expired_stops_at_live_entry() {
        let mut store = store(10).with_ttl(Duration::from_millis(100));
        store.set("old".to_string(), "1".to_string());
        store.set("older".to_string(), "2".to_string());
        store.get("old");

        // Both expire before `now`; nothing new was stamped after them.
        let now = Instant::now() + Duration::from_millis(150);
        store.set("fresh".to_string(), "3".to_string());
        store.entries.touch("fresh").unwrap().expires_at = Some(now + Duration::from_secs(1));

        assert_eq!(store.sweep_expired(now), 2);
        assert_eq!(keys(&store), vec!["fresh"]);
        assert_eq!(store.stats().expirations, 2);
    }

    #[test]
    fn test_store_sweep_without_ttl_removes_nothing() {
        let mut store = store(10);
        store.set("a".to_string(), "1".to_string());

        assert_eq!(store.sweep_expired(Instant::now() + Duration::from_secs(3600)), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lazy_get_revives_expired_entry() {
        let mut store = store(2).with_ttl(Duration::from_millis(10));
        store.set("a".to_string(), "1".to_string());

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(store.get("a").map(String::as_str), Some("1"));
        let (_, entry) = store.entries().next().unwrap();
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_store_strict_get_hides_expired_entry() {
        let mut store = store(2)
            .with_ttl(Duration::from_millis(10))
            .with_expiry_mode(ExpiryMode::Strict);
        store.set("a".to_string(), "1".to_string());

        std::thread::sleep(Duration::from_millis(20));

        assert!(store.get("a").is_none());
        assert!(store.is_empty());
        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_store_strict_set_on_expired_inserts_new() {
        let mut store = store(2)
            .with_ttl(Duration::from_millis(10))
            .with_expiry_mode(ExpiryMode::Strict);
        store.set("a".to_string(), "1".to_string());

        std::thread::sleep(Duration::from_millis(20));

        assert!(!store.set("a".to_string(), "2".to_string()));
        assert_eq!(store.get("a").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_store_clear_and_disable_ttl() {
        let mut store = store(4).with_ttl(Duration::from_secs(1));
        store.set("a".to_string(), "1".to_string());
        store.set("b".to_string(), "2".to_string());

        store.clear();
        store.disable_ttl();
        assert!(store.is_empty());
        assert_eq!(store.stats().total_entries, 0);

        store.set("c".to_string(), "3".to_string());
        let (_, entry) = store.entries().next().unwrap();
        assert!(entry.expires_at.is_none());
    }
}

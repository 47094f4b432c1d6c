//! Cache Entry Module
//!
//! Defines the value slot stored for each key, with its optional expiration.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A cached value together with its expiration instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry, stamping `now + ttl` when a TTL is given.
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: deadline(ttl),
        }
    }

    // == Refresh ==
    /// Pushes the expiration out to `now + ttl`.
    ///
    /// With no TTL the entry is left without an expiration.
    pub fn refresh(&mut self, ttl: Option<Duration>) {
        self.expires_at = deadline(ttl);
    }

    // == Is Expired ==
    /// Checks whether the entry had expired at `now`.
    ///
    /// Boundary condition: an entry whose expiration equals `now` is expired.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Checks whether the entry has expired as of the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the time left before expiration.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has already expired
    /// - `Some(remaining)` if the entry has a TTL and hasn't expired
    /// - `None` if the entry never expires
    #[cfg(test)]
    pub(crate) fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

/// `now + ttl`, or None when there is no TTL or the sum is past what the
/// clock can represent (such an entry never expires).
fn deadline(ttl: Option<Duration>) -> Option<Instant> {
    ttl.and_then(|ttl| Instant::now().checked_add(ttl))
}

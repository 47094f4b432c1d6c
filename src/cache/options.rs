//! Cache Options Module
//!
//! Construction-time settings: the cache-wide TTL with its sweep rate, and how
//! lookups treat entries that expired but were not swept yet.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{CacheError, Result};

// == TTL Config ==
/// A validated cache-wide TTL.
///
/// `ticks` is the number of sweeps per TTL period, so an expired entry is
/// removed at most `ttl / ticks` after it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlConfig {
    ttl: Duration,
    ticks: u32,
}

impl TtlConfig {
    /// Validates a TTL and sweep count.
    ///
    /// # Errors
    /// `InvalidTtlConfig` when `ttl` is zero or too large to add to the
    /// current instant, `ticks` is below 2, or the resulting sweep period
    /// rounds down to zero.
    pub fn new(ttl: Duration, ticks: u32) -> Result<Self> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtlConfig(
                "ttl duration must be positive".to_string(),
            ));
        }
        if Instant::now().checked_add(ttl).is_none() {
            return Err(CacheError::InvalidTtlConfig(format!(
                "ttl of {:?} overflows the clock",
                ttl
            )));
        }
        if ticks <= 1 {
            return Err(CacheError::InvalidTtlConfig(format!(
                "ticks must be greater than 1, got {}",
                ticks
            )));
        }
        if (ttl / ticks).is_zero() {
            return Err(CacheError::InvalidTtlConfig(format!(
                "ttl of {:?} is too short for {} ticks",
                ttl, ticks
            )));
        }
        Ok(Self { ttl, ticks })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Interval between two sweeps.
    pub fn sweep_period(&self) -> Duration {
        self.ttl / self.ticks
    }
}

// == Expiry Mode ==
/// How `get` and `set` treat an entry whose TTL ran out before the sweeper
/// reached it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpiryMode {
    /// Expiration is enforced by the sweeper only. A touch on an expired but
    /// unswept entry succeeds and revives it; lookups never read the clock
    /// to compare.
    #[default]
    Lazy,
    /// Every touch checks the expiration first; an expired entry is removed
    /// and treated as absent.
    Strict,
}

//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache is alive.
//!
//! # Tasks
//! - Expiry Sweeper: removes expired entries every `ttl / ticks`

mod sweeper;

pub(crate) use sweeper::spawn_sweeper;
pub use sweeper::SweeperHandle;

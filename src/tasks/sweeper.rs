//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired entries from the least
//! recently used end of a cache.

use std::hash::Hash;
use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::cache::{lock_state, SharedState};

// == Sweeper Handle ==
/// Owner side of a running sweeper.
///
/// Cancelling is immediate: no tick starts after [`cancel`](Self::cancel)
/// returns. A tick already holding the cache lock finishes first.
#[derive(Debug)]
pub struct SweeperHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the task to stop.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[cfg(test)]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns the sweeper for `state` on `runtime`, ticking every `period`.
///
/// The task keeps only a weak reference to the cache: it exits on
/// cancellation, once the cache is dropped, or once the cache no longer has
/// a TTL.
pub(crate) fn spawn_sweeper<K, V>(
    runtime: &Handle,
    state: Weak<SharedState<K, V>>,
    period: Duration,
) -> SweeperHandle
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let handle = runtime.spawn(async move {
        debug!(period = ?period, "Starting expiry sweeper");

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Expiry sweeper cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = {
                        let Some(state) = state.upgrade() else {
                            debug!("Cache dropped, stopping expiry sweeper");
                            break;
                        };
                        let mut guard = lock_state(&state);
                        if token.is_cancelled() || guard.store.ttl().is_none() {
                            debug!("Expiry sweeper stopped under lock");
                            break;
                        }
                        guard.store.sweep_expired(Instant::now())
                    };

                    if removed > 0 {
                        debug!(removed, "Expiry sweep removed expired entries");
                    } else {
                        trace!("Expiry sweep found no expired entries");
                    }
                }
            }
        }
    });

    SweeperHandle { cancel, handle }
}

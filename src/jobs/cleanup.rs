//! Background job: sweep expired entries out of the in-memory store.
//!
//! Reads already skip expired entries, so this only bounds memory when
//! states are minted but never redeemed. Not needed for Redis, which
//! expires keys itself.

use std::time::Duration;
use tokio::time;

use crate::cache::MemoryStore;

/// Spawn the background sweep task. Call this once at startup.
pub fn spawn(store: MemoryStore, every: Duration) {
    tokio::spawn(async move {
        let mut interval = time::interval(every);
        loop {
            interval.tick().await;
            let evicted = store.evict_expired();
            if evicted > 0 {
                tracing::debug!(evicted, remaining = store.len(), "swept expired store entries");
            }
        }
    });
}

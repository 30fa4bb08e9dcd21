//! Shared health state for the /health endpoint.
//! Updated by the loaders, read by the API.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Shared health metrics. Updated on every indexer round trip.
pub struct HealthState {
    started_at: Instant,
    indexer_fetches: AtomicU64,
    indexer_failures: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            indexer_fetches: AtomicU64::new(0),
            indexer_failures: AtomicU64::new(0),
        }
    }

    pub fn record_fetch(&self, ok: bool) {
        self.indexer_fetches.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.indexer_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn indexer_fetches(&self) -> u64 {
        self.indexer_fetches.load(Ordering::Relaxed)
    }

    pub fn indexer_failures(&self) -> u64 {
        self.indexer_failures.load(Ordering::Relaxed)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_count_separately_from_fetches() {
        let health = HealthState::new();
        health.record_fetch(true);
        health.record_fetch(false);
        health.record_fetch(true);
        assert_eq!(health.indexer_fetches(), 3);
        assert_eq!(health.indexer_failures(), 1);
    }
}

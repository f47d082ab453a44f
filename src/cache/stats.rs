//! Cache Statistics Module
//!
//! Process-wide hit/miss/error counters. Counters are atomic so that the
//! remote-backend path can record outcomes without taking the store lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Monotonically increasing cache performance counters.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Error ==
    /// Increments the error counter (backend failures, serialization).
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Returns a serializable point-in-time view of the counters.
    pub fn snapshot(&self, backend: &str, entries: usize) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        CacheStatsSnapshot {
            hits,
            misses,
            errors: self.errors.load(Ordering::Relaxed),
            hit_rate_percent: hit_rate_percent(hits, misses),
            backend: backend.to_string(),
            entries,
        }
    }
}

/// Hit rate as a percentage rounded to two decimals, 0.0 with no traffic.
fn hit_rate_percent(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        (hits as f64 / total as f64 * 10_000.0).round() / 100.0
    }
}

// == Snapshot ==
/// Point-in-time statistics view exposed on the admin endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsSnapshot {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed retrievals (absent or expired)
    pub misses: u64,
    /// Number of backend/serialization failures
    pub errors: u64,
    /// hits / (hits + misses) as a percentage
    pub hit_rate_percent: f64,
    /// Active backend kind ("remote" or "in-memory")
    pub backend: String,
    /// Current number of entries in the in-memory store
    pub entries: usize,
}

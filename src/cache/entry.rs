//! Cache Entry Module
//!
//! Defines the structure for individual cache entries. Every entry carries an
//! expiration timestamp; the protection layer never stores immortal values.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached response: the serialized payload plus expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// JSON-serialized payload
    pub value: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from `now`.
    pub fn new(value: String, ttl_seconds: u64, now: u64) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: now + ttl_seconds * 1000,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so a
    /// value is never returned to a caller at or past its expiry instant.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

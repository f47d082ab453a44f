//! Cache Module
//!
//! Dual-mode response cache: a remote shared backend when reachable, with a
//! bounded in-memory fallback store using lazy TTL expiration and
//! insertion-order eviction.

mod backend;
mod entry;
pub mod key;
mod local;
mod order;
mod service;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::RemoteCache;
pub use entry::{current_millis, CacheEntry};
pub use local::{LocalStore, Lookup};
pub use order::InsertionOrder;
pub use service::CacheService;
pub use stats::{CacheStats, CacheStatsSnapshot};

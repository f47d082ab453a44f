//! Remote Cache Backend
//!
//! Capability trait for an optional shared cache backend. The service probes
//! `is_ready` per call and delegates when the backend reports itself ready;
//! otherwise (or on any failure) it falls back to the in-memory store.
//! No concrete network client is bundled here: deployments inject an
//! implementation, tests inject mocks.

use async_trait::async_trait;

// == Remote Cache Trait ==
/// Opaque string key/value backend shared across processes.
///
/// Values are JSON-encoded strings; the backend never interprets them.
/// Implementations must be cheap to probe via `is_ready`, since it is
/// evaluated on every cache operation.
#[async_trait]
pub trait RemoteCache: Send + Sync {
    /// Whether the backend is currently connected and usable.
    fn is_ready(&self) -> bool;

    /// Fetches the value stored under `key`, if any.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key` with the given TTL.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> anyhow::Result<()>;

    /// Removes `key`, reporting whether it existed.
    async fn del(&self, key: &str) -> anyhow::Result<bool>;

    /// Removes every key containing `fragment`, returning the count removed.
    async fn del_matching(&self, fragment: &str) -> anyhow::Result<usize>;
}

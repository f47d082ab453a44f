//! Cache Service Module
//!
//! Two-tier response cache fronting the report endpoints. Operations go to
//! the remote backend when it reports ready, with a short timeout, and fall
//! back to the bounded in-memory store otherwise. Cache failures are counted
//! and logged but never surfaced to the request path.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::local::{LocalStore, Lookup};
use crate::cache::{current_millis, key, CacheStats, CacheStatsSnapshot, RemoteCache};
use crate::config::Config;
use crate::error::Result;

// == Cache Service ==
/// Dual-mode cache: remote backend when reachable, in-memory store otherwise.
pub struct CacheService {
    /// Bounded in-process fallback store
    local: RwLock<LocalStore>,
    /// Optional shared backend, probed per call
    remote: Option<Arc<dyn RemoteCache>>,
    /// Process-wide hit/miss/error counters
    stats: CacheStats,
    /// TTL in seconds applied when the caller does not specify one
    default_ttl: u64,
    /// Application prefix for all derived keys
    key_prefix: String,
    /// Budget for each remote backend call before falling back
    remote_timeout: Duration,
}

impl CacheService {
    // == Constructors ==
    /// Creates a service with no remote backend (in-memory only).
    pub fn new(max_entries: usize, trim_target: usize, default_ttl: u64, key_prefix: &str) -> Self {
        Self {
            local: RwLock::new(LocalStore::new(max_entries, trim_target)),
            remote: None,
            stats: CacheStats::new(),
            default_ttl,
            key_prefix: key_prefix.to_string(),
            remote_timeout: Duration::from_millis(150),
        }
    }

    /// Creates a service from server configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut service = Self::new(
            config.cache_max_entries,
            config.cache_trim_target,
            config.default_ttl,
            &config.key_prefix,
        );
        service.remote_timeout = Duration::from_millis(config.remote_timeout_ms);
        service
    }

    /// Attaches a remote backend.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteCache>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Remote backend handle, only when it currently reports ready.
    fn ready_remote(&self) -> Option<Arc<dyn RemoteCache>> {
        self.remote.as_ref().filter(|r| r.is_ready()).map(Arc::clone)
    }

    // == Key Derivation ==
    /// Derives the canonical cache key for a namespace and parameter set.
    pub fn key(&self, namespace: &str, params: &HashMap<String, Value>) -> String {
        key::encode(&self.key_prefix, namespace, params)
    }

    // == Get ==
    /// Retrieves and deserializes a cached value, or None on miss.
    ///
    /// A value that fails to deserialize is counted as an error and treated
    /// as a miss; the caller recomputes.
    pub async fn get<T: DeserializeOwned>(&self, cache_key: &str) -> Option<T> {
        let raw = self.get_raw(cache_key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                self.stats.record_error();
                warn!(key = cache_key, error = %err, "Failed to deserialize cached value");
                None
            }
        }
    }

    /// Raw lookup; counts hit/miss/error.
    async fn get_raw(&self, cache_key: &str) -> Option<String> {
        if let Some(remote) = self.ready_remote() {
            match timeout(self.remote_timeout, remote.get(cache_key)).await {
                Ok(Ok(Some(raw))) => {
                    self.stats.record_hit();
                    return Some(raw);
                }
                Ok(Ok(None)) => {
                    self.stats.record_miss();
                    return None;
                }
                Ok(Err(err)) => {
                    self.stats.record_error();
                    warn!(key = cache_key, error = %err, "Remote cache get failed, using in-memory store");
                }
                Err(_) => {
                    self.stats.record_error();
                    warn!(key = cache_key, "Remote cache get timed out, using in-memory store");
                }
            }
        }

        let now = current_millis();
        let mut local = self.local.write().await;
        match local.get(cache_key, now) {
            Lookup::Hit(raw) => {
                self.stats.record_hit();
                Some(raw)
            }
            Lookup::Miss | Lookup::Expired => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Serializes and stores a value with the given TTL (default when None).
    ///
    /// Returns false only when the value cannot be serialized; backend
    /// failures fall back to the in-memory store.
    pub async fn set<T: Serialize>(&self, cache_key: &str, value: &T, ttl_seconds: Option<u64>) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                self.stats.record_error();
                warn!(key = cache_key, error = %err, "Failed to serialize value for caching");
                return false;
            }
        };
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        if let Some(remote) = self.ready_remote() {
            match timeout(self.remote_timeout, remote.set(cache_key, &raw, ttl)).await {
                Ok(Ok(())) => return true,
                Ok(Err(err)) => {
                    self.stats.record_error();
                    warn!(key = cache_key, error = %err, "Remote cache set failed, using in-memory store");
                }
                Err(_) => {
                    self.stats.record_error();
                    warn!(key = cache_key, "Remote cache set timed out, using in-memory store");
                }
            }
        }

        let now = current_millis();
        let mut local = self.local.write().await;
        let evicted = local.insert(cache_key.to_string(), raw, ttl, now);
        if evicted > 0 {
            debug!(evicted, "Trimmed in-memory cache back to capacity target");
        }
        true
    }

    // == Delete ==
    /// Removes a single entry from both tiers; absent keys are not an error.
    pub async fn delete(&self, cache_key: &str) -> bool {
        let mut removed = false;

        if let Some(remote) = self.ready_remote() {
            match timeout(self.remote_timeout, remote.del(cache_key)).await {
                Ok(Ok(existed)) => removed = existed,
                Ok(Err(err)) => {
                    self.stats.record_error();
                    warn!(key = cache_key, error = %err, "Remote cache delete failed");
                }
                Err(_) => {
                    self.stats.record_error();
                    warn!(key = cache_key, "Remote cache delete timed out");
                }
            }
        }

        let local_removed = self.local.write().await.remove(cache_key);
        removed || local_removed
    }

    // == Clear Pattern ==
    /// Removes every key containing the pattern (trailing `*` stripped) from
    /// both tiers, returning the total count removed.
    pub async fn clear_pattern(&self, pattern: &str) -> usize {
        let fragment = pattern.trim_end_matches('*');
        let mut cleared = 0;

        if let Some(remote) = self.ready_remote() {
            match timeout(self.remote_timeout, remote.del_matching(fragment)).await {
                Ok(Ok(count)) => cleared += count,
                Ok(Err(err)) => {
                    self.stats.record_error();
                    warn!(pattern, error = %err, "Remote cache pattern clear failed");
                }
                Err(_) => {
                    self.stats.record_error();
                    warn!(pattern, "Remote cache pattern clear timed out");
                }
            }
        }

        cleared += self.local.write().await.clear_matching(fragment);
        cleared
    }

    // == Invalidate Report ==
    /// Clears all cached responses for a logical report type. Unknown types
    /// fall back to the application-wide pattern.
    pub async fn invalidate_report(&self, report_type: &str) -> usize {
        let pattern = match report_type {
            "financial" | "members" | "payments" | "expenses" => {
                format!("{}:{}:*", self.key_prefix, report_type)
            }
            _ => format!("{}:*", self.key_prefix),
        };
        self.clear_pattern(&pattern).await
    }

    // == Cacheable ==
    /// Get-or-compute wrapper: on a miss the closure runs, its result is
    /// cached, and the fresh value is returned. Concurrent misses for the
    /// same key may each compute; the report volume makes that acceptable.
    pub async fn cacheable<T, F, Fut>(&self, cache_key: &str, ttl_seconds: Option<u64>, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(cached) = self.get::<T>(cache_key).await {
            return Ok(cached);
        }

        let value = compute().await?;
        self.set(cache_key, &value, ttl_seconds).await;
        Ok(value)
    }

    // == Cleanup Expired ==
    /// Eagerly removes expired in-memory entries and reclaims burst growth
    /// above the trim target; invoked by the sweep task.
    pub async fn cleanup_expired(&self) -> usize {
        let now = current_millis();
        let mut local = self.local.write().await;
        local.cleanup_expired(now) + local.enforce_capacity()
    }

    // == Stats ==
    /// Returns a point-in-time statistics snapshot.
    pub async fn stats(&self) -> CacheStatsSnapshot {
        let entries = self.local.read().await.len();
        let backend = if self.ready_remote().is_some() {
            "remote"
        } else {
            "in-memory"
        };
        self.stats.snapshot(backend, entries)
    }

    /// Default TTL in seconds, used by callers for response headers.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }
}

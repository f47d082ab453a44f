//! Background Sweep Tasks
//!
//! Periodic eager cleanup complementing the lazy on-access expiry: one task
//! sweeps expired cache entries, another drops stale rate-limit windows and
//! expired blacklist entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheService;
use crate::limiter::{IpRateLimiter, RateLimiter};

/// Spawns a background task that periodically removes expired cache entries.
///
/// Returns a JoinHandle used to abort the task during graceful shutdown.
pub fn spawn_cache_cleanup(cache: Arc<CacheService>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "Starting cache expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;
            if removed > 0 {
                info!(removed, "Cache sweep removed expired entries");
            } else {
                debug!("Cache sweep found no expired entries");
            }
        }
    })
}

/// Spawns a background task that periodically drops stale rate-limit windows
/// and expired blacklist entries from both limiters.
pub fn spawn_limiter_cleanup(
    limiter: Arc<RateLimiter>,
    ip_limiter: Arc<IpRateLimiter>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "Starting rate limiter sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let (windows, blacklist) = limiter.cleanup_expired().await;
            let ip_windows = ip_limiter.cleanup_expired().await;
            if windows + blacklist + ip_windows > 0 {
                info!(windows, blacklist, ip_windows, "Limiter sweep removed stale state");
            } else {
                debug!("Limiter sweep found no stale state");
            }
        }
    })
}

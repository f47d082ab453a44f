//! IP Rate Limiter
//!
//! Fixed-window limiter for fully unauthenticated endpoints such as login.
//! Deliberately simpler than the client limiter: one-minute window, flat
//! quota, no role multipliers and no blacklist, because these endpoints have
//! no authenticated identity to reason about.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::cache::current_millis;

const WINDOW_MS: u64 = 60 * 1000;

#[derive(Debug)]
struct IpWindow {
    count: u64,
    window_start: u64,
}

// == IP Decision ==
/// Outcome of an IP quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpDecision {
    /// Whether the request is within quota
    pub allowed: bool,
    /// Per-minute quota being enforced
    pub limit: u64,
    /// Requests left in the current window
    pub remaining: u64,
    /// When the window expires (Unix milliseconds)
    pub reset_at: u64,
}

// == IP Rate Limiter ==
/// Per-IP fixed-window limiter for public endpoints.
#[derive(Debug)]
pub struct IpRateLimiter {
    windows: Mutex<HashMap<String, IpWindow>>,
    requests_per_minute: u64,
}

impl IpRateLimiter {
    // == Constructor ==
    /// Creates a limiter allowing `requests_per_minute` per source address.
    pub fn new(requests_per_minute: u64) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            requests_per_minute,
        }
    }

    // == Check ==
    /// Records one request from `ip` and decides whether it is allowed.
    pub async fn check(&self, ip: &str) -> IpDecision {
        self.check_at(ip, current_millis()).await
    }

    pub(crate) async fn check_at(&self, ip: &str, now: u64) -> IpDecision {
        let mut windows = self.windows.lock().await;

        let window = windows.entry(ip.to_string()).or_insert(IpWindow {
            count: 0,
            window_start: now,
        });
        if now.saturating_sub(window.window_start) > WINDOW_MS {
            window.count = 0;
            window.window_start = now;
        }
        window.count += 1;

        IpDecision {
            allowed: window.count <= self.requests_per_minute,
            limit: self.requests_per_minute,
            remaining: self.requests_per_minute.saturating_sub(window.count),
            reset_at: window.window_start + WINDOW_MS,
        }
    }

    // == Cleanup Expired ==
    /// Drops windows that have fully elapsed. Returns the count removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(current_millis()).await
    }

    pub(crate) async fn cleanup_expired_at(&self, now: u64) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.saturating_sub(w.window_start) <= WINDOW_MS);
        before - windows.len()
    }
}

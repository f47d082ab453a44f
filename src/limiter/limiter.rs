//! Rate Limiter Module
//!
//! Per-client sliding-window rate limiting with role-aware quota multipliers
//! and blacklist escalation for gross abuse. Denial is a return value, never
//! an error; the HTTP layer maps decisions to status codes (429 for quota
//! exhaustion, 403 for blacklisted clients).

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache::current_millis;
use crate::limiter::{ClientWindow, RateProfile};

/// How long a blacklist entry stands before expiring on its own.
const BLACKLIST_DURATION_MS: u64 = 60 * 60 * 1000;

/// Going this many times over the effective limit within one window
/// escalates from quota denial to blacklisting.
const BLACKLIST_ESCALATION_FACTOR: u64 = 3;

// == Identify ==
/// Resolves the quota bucket for a request. Authenticated identity always
/// wins over the source address, so a user switching networks keeps one
/// bucket.
pub fn identify(user_id: Option<&str>, remote_ip: Option<&str>) -> String {
    if let Some(id) = user_id.filter(|id| !id.is_empty()) {
        return format!("user_{}", id);
    }
    match remote_ip.filter(|ip| !ip.is_empty()) {
        Some(ip) => format!("ip_{}", ip),
        None => "ip_unknown".to_string(),
    }
}

// == Rate Decision ==
/// Outcome of a quota check. `Blacklisted` is distinct from quota denial so
/// callers can respond 403 rather than 429.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateDecision {
    /// Request is within quota
    Allowed {
        /// Effective limit after the role multiplier
        limit: u64,
        /// Requests left in the current window
        remaining: u64,
        /// When the window expires (Unix milliseconds)
        reset_at: u64,
    },
    /// Quota exhausted for this window
    LimitExceeded { limit: u64, reset_at: u64 },
    /// Client is hard-denied until the entry expires or an admin resets it
    Blacklisted { until: u64 },
}

// == Blacklist Entry ==
#[derive(Debug, Clone)]
struct BlacklistEntry {
    reason: String,
    expires_at: u64,
}

#[derive(Debug, Default)]
struct LimiterState {
    /// One window per (client, profile) pair, keyed "clientId:profile"
    windows: HashMap<String, ClientWindow>,
    /// Hard-denied clients, keyed by client id alone
    blacklist: HashMap<String, BlacklistEntry>,
}

// == Limiter Stats ==
/// Operational counters exposed on the admin endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimiterStats {
    /// Number of live (client, profile) windows
    pub active_clients: usize,
    /// Number of currently blacklisted clients
    pub blacklisted_clients: usize,
}

// == Rate Limiter ==
/// Sliding-window rate limiter with blacklist escalation.
///
/// All state lives behind a single mutex; check-and-record is atomic per
/// call, which is what the increment-then-compare sequence requires.
#[derive(Debug, Default)]
pub struct RateLimiter {
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    // == Constructor ==
    /// Creates a limiter with no recorded traffic.
    pub fn new() -> Self {
        Self::default()
    }

    // == Check And Record ==
    /// Records one request for the client under the given profile and
    /// decides whether it is allowed. `multiplier` scales the profile's base
    /// cap (effective limit = floor(base * multiplier)).
    pub async fn check_and_record(
        &self,
        client_id: &str,
        profile: RateProfile,
        multiplier: f64,
    ) -> RateDecision {
        self.check_and_record_at(client_id, profile, multiplier, current_millis())
            .await
    }

    /// Clock-injected variant of [`check_and_record`]; the public entry
    /// point passes the wall clock.
    ///
    /// [`check_and_record`]: RateLimiter::check_and_record
    pub(crate) async fn check_and_record_at(
        &self,
        client_id: &str,
        profile: RateProfile,
        multiplier: f64,
        now: u64,
    ) -> RateDecision {
        let mut state = self.state.lock().await;

        if let Some(entry) = state.blacklist.get(client_id) {
            if now < entry.expires_at {
                return RateDecision::Blacklisted {
                    until: entry.expires_at,
                };
            }
            state.blacklist.remove(client_id);
        }

        let window_key = format!("{}:{}", client_id, profile.name());
        let (count, reset_at) = {
            let window = state
                .windows
                .entry(window_key)
                .or_insert_with(|| ClientWindow::new(profile, now));
            if window.is_stale(now) {
                window.reset(now);
            }
            window.count += 1;
            window.last_seen = now;
            (window.count, window.reset_at())
        };

        let limit = (profile.max_requests() as f64 * multiplier).floor() as u64;

        if count > limit * BLACKLIST_ESCALATION_FACTOR {
            let until = now + BLACKLIST_DURATION_MS;
            let reason = format!(
                "{} requests against the {} profile (limit {})",
                count,
                profile.name(),
                limit
            );
            warn!(client_id, %profile, count, limit, "Blacklisting client for gross over-use");
            state.blacklist.insert(
                client_id.to_string(),
                BlacklistEntry {
                    reason,
                    expires_at: until,
                },
            );
            return RateDecision::Blacklisted { until };
        }

        if count <= limit {
            RateDecision::Allowed {
                limit,
                remaining: limit - count,
                reset_at,
            }
        } else {
            RateDecision::LimitExceeded { limit, reset_at }
        }
    }

    // == Reset ==
    /// Administrative override: drops every window belonging to the client
    /// and lifts any blacklist entry. Returns the number of windows removed.
    pub async fn reset(&self, client_id: &str) -> usize {
        let mut state = self.state.lock().await;

        let prefix = format!("{}:", client_id);
        let keys: Vec<String> = state
            .windows
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect();
        for key in &keys {
            state.windows.remove(key);
        }

        if let Some(entry) = state.blacklist.remove(client_id) {
            info!(client_id, reason = %entry.reason, "Lifted blacklist entry on admin reset");
        }

        keys.len()
    }

    // == Cleanup Expired ==
    /// Periodic sweep: drops windows whose time has fully elapsed and
    /// blacklist entries past their expiry. Returns (windows, blacklist)
    /// counts removed.
    pub async fn cleanup_expired(&self) -> (usize, usize) {
        self.cleanup_expired_at(current_millis()).await
    }

    pub(crate) async fn cleanup_expired_at(&self, now: u64) -> (usize, usize) {
        let mut state = self.state.lock().await;

        let windows_before = state.windows.len();
        state.windows.retain(|_, window| !window.is_stale(now));
        let windows_removed = windows_before - state.windows.len();

        let blacklist_before = state.blacklist.len();
        state.blacklist.retain(|_, entry| now < entry.expires_at);
        let blacklist_removed = blacklist_before - state.blacklist.len();

        (windows_removed, blacklist_removed)
    }

    // == Stats ==
    /// Returns current operational counters.
    pub async fn stats(&self) -> RateLimiterStats {
        let state = self.state.lock().await;
        RateLimiterStats {
            active_clients: state.windows.len(),
            blacklisted_clients: state.blacklist.len(),
        }
    }
}

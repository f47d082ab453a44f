//! Client Window Module
//!
//! Per-client request counter for one limit profile.

use crate::limiter::RateProfile;

// == Client Window ==
/// Sliding-window counter for a single (client, profile) pair.
#[derive(Debug, Clone)]
pub struct ClientWindow {
    /// Requests recorded in the current window
    pub count: u64,
    /// Window start timestamp (Unix milliseconds)
    pub window_start: u64,
    /// Timestamp of the most recent request
    pub last_seen: u64,
    /// Profile this window counts against
    pub profile: RateProfile,
}

impl ClientWindow {
    // == Constructor ==
    /// Opens a fresh window at `now` with no requests recorded yet.
    pub fn new(profile: RateProfile, now: u64) -> Self {
        Self {
            count: 0,
            window_start: now,
            last_seen: now,
            profile,
        }
    }

    // == Is Stale ==
    /// Whether the window has fully elapsed as of `now`.
    pub fn is_stale(&self, now: u64) -> bool {
        now.saturating_sub(self.window_start) > self.profile.window_ms()
    }

    // == Reset ==
    /// Starts a new window at `now`, discarding the old count.
    pub fn reset(&mut self, now: u64) {
        self.count = 0;
        self.window_start = now;
    }

    // == Reset At ==
    /// Timestamp at which the current window expires.
    pub fn reset_at(&self) -> u64 {
        self.window_start + self.profile.window_ms()
    }
}

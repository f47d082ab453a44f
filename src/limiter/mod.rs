//! Rate Limiter Module
//!
//! Per-client sliding-window quotas with role-aware multipliers and
//! blacklist escalation, plus a simpler per-IP limiter for unauthenticated
//! endpoints.

mod ip;
#[allow(clippy::module_inception)]
mod limiter;
mod profile;
mod window;

// Re-export public types
pub use ip::{IpDecision, IpRateLimiter};
pub use limiter::{identify, RateDecision, RateLimiter, RateLimiterStats};
pub use profile::{role_multiplier, RateProfile};
pub use window::ClientWindow;

//! Request Guard - response cache and rate limiting for report endpoints
//!
//! Protects expensive report/query handlers with a dual-mode response cache
//! (remote backend with in-memory fallback) and per-client sliding-window
//! rate limiting with blacklist escalation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::{spawn_cache_cleanup, spawn_limiter_cleanup};

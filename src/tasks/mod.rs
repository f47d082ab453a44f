//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: eagerly removes expired cache entries
//! - Limiter sweep: drops stale rate-limit windows and expired blacklist entries

mod cleanup;

pub use cleanup::{spawn_cache_cleanup, spawn_limiter_cleanup};

//! Response DTOs for the protection service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStatsSnapshot;
use crate::limiter::RateLimiterStats;

/// Response body for GET /admin/stats.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Cache counters and backend kind
    pub cache: CacheStatsSnapshot,
    /// Rate limiter counters
    pub rate_limiter: RateLimiterStats,
}

/// Response body for POST /admin/cache/invalidate/:report_type.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Report type whose namespace was cleared
    pub report_type: String,
    /// Number of cache entries removed
    pub cleared: usize,
}

impl InvalidateResponse {
    /// Creates a new InvalidateResponse.
    pub fn new(report_type: impl Into<String>, cleared: usize) -> Self {
        Self {
            report_type: report_type.into(),
            cleared,
        }
    }
}

/// Response body for POST /admin/limits/reset/:client_id.
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    /// Success message
    pub message: String,
    /// Client whose limits were reset
    pub client_id: String,
    /// Number of rate-limit windows removed
    pub windows_removed: usize,
}

impl ResetResponse {
    /// Creates a new ResetResponse.
    pub fn new(client_id: impl Into<String>, windows_removed: usize) -> Self {
        let client_id = client_id.into();
        Self {
            message: format!("Limits for '{}' reset successfully", client_id),
            client_id,
            windows_removed,
        }
    }
}

/// Response body for the health endpoint (GET /health).
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

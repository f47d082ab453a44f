//! Error types for the protection layer
//!
//! Provides unified error handling using thiserror. Quota denial and
//! blacklisting are carried as errors only at the HTTP boundary, where they
//! map to 429 and 403; inside the limiter they are ordinary return values.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{TimeZone, Utc};
use serde_json::json;
use thiserror::Error;

// == Guard Error Enum ==
/// Unified error type for the request-protection service.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Request referenced a report kind the service does not know
    #[error("Unknown report kind: {0}")]
    UnknownReport(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Quota for this window is exhausted
    #[error("Rate limit exceeded")]
    RateLimited {
        /// Effective limit for the window
        limit: u64,
        /// When the window resets (Unix milliseconds)
        reset_at: u64,
    },

    /// Client is blacklisted for gross over-use
    #[error("Access temporarily blocked due to excessive requests")]
    Blacklisted {
        /// When the block lifts (Unix milliseconds)
        until: u64,
    },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Formats a millisecond timestamp as RFC 3339 for response bodies.
fn format_millis(millis: u64) -> String {
    match Utc.timestamp_millis_opt(millis as i64).single() {
        Some(dt) => dt.to_rfc3339(),
        None => millis.to_string(),
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        match self {
            GuardError::UnknownReport(kind) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Unknown report kind: {}", kind) })),
            )
                .into_response(),
            GuardError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": msg })),
            )
                .into_response(),
            GuardError::RateLimited { limit, reset_at } => {
                let body = Json(json!({
                    "error": "RATE_LIMIT_EXCEEDED",
                    "message": "Too many requests. Please try again later",
                    "resetTime": format_millis(reset_at),
                }));
                let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
                let headers = response.headers_mut();
                headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
                headers.insert("x-ratelimit-remaining", HeaderValue::from(0u64));
                response
            }
            GuardError::Blacklisted { until } => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "RATE_LIMIT_EXCEEDED",
                    "message": "Access temporarily blocked due to excessive requests",
                    "blockedUntil": format_millis(until),
                })),
            )
                .into_response(),
            GuardError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the protection service.
pub type Result<T> = std::result::Result<T, GuardError>;

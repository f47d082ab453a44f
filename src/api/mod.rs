//! API Module
//!
//! HTTP handlers and routing for the protection service.
//!
//! # Endpoints
//! - `GET /reports/:kind` - Rate-limited, cached report endpoint
//! - `POST /auth/login` - Unauthenticated endpoint under the IP limiter
//! - `GET /admin/stats` - Combined cache and limiter statistics
//! - `POST /admin/cache/invalidate/:report_type` - Bulk cache invalidation
//! - `POST /admin/limits/reset/:client_id` - Administrative limit reset
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

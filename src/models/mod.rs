//! Request and Response models for the protection service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::LoginRequest;
pub use responses::{
    ErrorResponse, HealthResponse, InvalidateResponse, ResetResponse, StatsResponse,
};

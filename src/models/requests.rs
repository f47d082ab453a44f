//! Request DTOs for the protection service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /auth/login.
///
/// Credential verification happens upstream; this service only shapes the
/// request and applies the unauthenticated IP quota in front of it.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account identifier
    pub username: String,
    /// Account secret
    pub password: String,
}

impl LoginRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.username.is_empty() {
            return Some("Username cannot be empty".to_string());
        }
        if self.password.is_empty() {
            return Some("Password cannot be empty".to_string());
        }
        None
    }
}

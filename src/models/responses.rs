//! Response DTOs for the storefront API
//!
//! Defines the structure of outgoing HTTP response bodies that are not
//! upstream payloads or stored records.

use serde::Serialize;
use serde_json::Value;

use crate::error::NOT_CONFIGURED_MESSAGE;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { ok: true }
    }
}

/// Response body for login and registration.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    /// Stored user record without its password
    pub user: Value,
}

impl AuthResponse {
    /// Wraps `user`, dropping its `password` field.
    pub fn for_user(mut user: Value) -> Self {
        if let Some(fields) = user.as_object_mut() {
            fields.remove("password");
        }
        Self {
            success: true,
            user,
        }
    }
}

/// Listing returned while the upstream catalog is disabled.
#[derive(Debug, Clone, Serialize)]
pub struct EmptyListingResponse {
    pub results: Vec<Value>,
    pub total_count: u64,
    pub error: String,
}

impl EmptyListingResponse {
    pub fn not_configured() -> Self {
        Self {
            results: Vec::new(),
            total_count: 0,
            error: NOT_CONFIGURED_MESSAGE.to_string(),
        }
    }
}

/// Generic acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

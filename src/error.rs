//! Error types for the storefront backend
//!
//! Provides unified error handling using thiserror. Every variant renders as a
//! JSON body carrying an `error` field.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned when no GameSpot credential is configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "GameSpot API key not configured";

// == App Error Enum ==
/// Unified error type for the storefront backend.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream answered with a non-success status
    #[error("Upstream error {status}")]
    Upstream { status: u16, details: String },

    /// Upstream could not be reached or returned an unreadable body
    #[error("Upstream transport failure: {0}")]
    Transport(String),

    /// No upstream credential configured
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    NotConfigured,

    /// Record not found in the local store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Login failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Auth request refused (missing fields, duplicate account)
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Per-client request ceiling reached
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Datastore file could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Datastore contents could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Upstream { status, details } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                json!({ "error": "Upstream error", "status": status, "details": details }),
            ),
            AppError::Transport(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to reach upstream API", "details": details }),
            ),
            AppError::NotConfigured => (
                StatusCode::NOT_FOUND,
                json!({ "error": NOT_CONFIGURED_MESSAGE }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({ "success": false, "error": msg }),
            ),
            AppError::Rejected(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": msg }),
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": "Too many requests, please try again later." }),
            ),
            AppError::Storage(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

// == Extractor Rejections ==
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the storefront backend.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_upstream_error_keeps_status() {
        let (status, body) = render(AppError::Upstream {
            status: 503,
            details: "maintenance".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Upstream error");
        assert_eq!(body["status"], 503);
        assert_eq!(body["details"], "maintenance");
    }

    #[tokio::test]
    async fn test_auth_errors_carry_success_flag() {
        let (status, body) = render(AppError::Unauthorized("Invalid password".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid password");

        let (status, body) = render(AppError::Rejected("User already exists".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_not_configured_is_404() {
        let (status, body) = render(AppError::NotConfigured).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], NOT_CONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn test_internal_errors_hide_detail() {
        let (status, body) = render(AppError::Internal("lock poisoned".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}

//! Auth Handlers
//!
//! Login and registration against the `users` collection. Passwords are
//! compared as stored.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{AppState, JsonBody};
use crate::db::{Collection, Filter};
use crate::error::{AppError, Result};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};

/// Handler for POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (email, password) = req
        .credentials()
        .ok_or_else(|| AppError::Rejected("Email and password are required".to_string()))?;
    debug!(email, "login attempt");

    let user = state
        .store
        .find_one(Collection::Users, &Filter::new().eq("email", email))
        .await
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if user.get("password").and_then(Value::as_str) != Some(password) {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    Ok(Json(AuthResponse::for_user(user)))
}

/// Handler for POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::Rejected(error_msg));
    }
    let RegisterRequest {
        email,
        password,
        name,
        mut extra,
    } = req;
    let email = email.unwrap_or_default().trim().to_string();

    let existing = state
        .store
        .find_one(Collection::Users, &Filter::new().eq("email", email.as_str()))
        .await;
    if existing.is_some() {
        return Err(AppError::Rejected("User already exists".to_string()));
    }

    extra.remove("id");
    extra.insert("email".to_string(), Value::from(email.as_str()));
    extra.insert("password".to_string(), Value::from(password.unwrap_or_default()));
    extra.insert("name".to_string(), Value::from(name.unwrap_or_default()));
    extra.insert("createdAt".to_string(), Value::from(chrono::Utc::now().to_rfc3339()));

    let user = state.store.push(Collection::Users, extra).await?;
    info!(email = %email, "user registered");

    Ok((StatusCode::CREATED, Json(AuthResponse::for_user(user))))
}

//! Favorite Handlers

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::api::{AppState, JsonBody, QueryString};
use crate::db::{Collection, Filter};
use crate::error::{AppError, Result};
use crate::models::{NewFavoriteRequest, SuccessResponse};

/// Handler for GET /api/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    QueryString(query): QueryString<BTreeMap<String, String>>,
) -> Json<Vec<Value>> {
    let favorites = state
        .store
        .find_all(Collection::Favorites, &Filter::from_query(&query))
        .await;
    Json(favorites)
}

/// Handler for POST /api/favorites
///
/// Favoriting the same product twice returns the existing record with 200.
pub async fn create_favorite(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewFavoriteRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let pair = Filter::new()
        .eq("userId", req.user_id.clone())
        .eq("productId", req.product_id.clone());
    if let Some(existing) = state.store.find_one(Collection::Favorites, &pair).await {
        return Ok((StatusCode::OK, Json(existing)));
    }

    let mut record = req.extra;
    record.remove("id");
    record.insert("userId".to_string(), req.user_id);
    record.insert("productId".to_string(), req.product_id);
    record.insert("createdAt".to_string(), Value::from(chrono::Utc::now().to_rfc3339()));

    let favorite = state.store.push(Collection::Favorites, record).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Handler for DELETE /api/favorites/:id
pub async fn delete_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let removed = state
        .store
        .remove(Collection::Favorites, &Filter::new().eq("id", id))
        .await?;

    if removed.is_empty() {
        return Err(AppError::NotFound("Favorite not found".to_string()));
    }
    Ok(Json(SuccessResponse::ok()))
}

//! Product Handlers

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
use crate::models::NewProductRequest;

/// Handler for GET /api/products
///
/// Every query parameter is an equality filter (`?category=consoles`).
pub async fn list_products(
    State(state): State<AppState>,
    QueryString(query): QueryString<BTreeMap<String, String>>,
) -> Json<Vec<Value>> {
    let products = state
        .store
        .find_all(Collection::Products, &Filter::from_query(&query))
        .await;
    Json(products)
}

/// Handler for POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewProductRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let mut record = req.extra;
    record.remove("id");
    record.insert("name".to_string(), Value::from(req.name.unwrap_or_default().trim()));
    record.insert("price".to_string(), Value::from(req.price.unwrap_or_default()));
    record.insert("createdAt".to_string(), Value::from(chrono::Utc::now().to_rfc3339()));

    let product = state.store.push(Collection::Products, record).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state
        .store
        .find_one(Collection::Products, &Filter::new().eq("id", id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

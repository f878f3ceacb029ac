//! Order Handlers
//!
//! Placing an order prices it from its lines and empties the user's cart.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use super::cart::clear_cart;
use crate::api::{AppState, JsonBody, QueryString};
use crate::db::{Collection, Filter};
use crate::error::{AppError, Result};
use crate::models::NewOrderRequest;

/// Handler for GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    QueryString(query): QueryString<BTreeMap<String, String>>,
) -> Json<Vec<Value>> {
    let orders = state
        .store
        .find_all(Collection::Orders, &Filter::from_query(&query))
        .await;
    Json(orders)
}

/// Handler for POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NewOrderRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let total = order_total(&req.items);
    let user_id = req.user_id;

    let mut record = req.extra;
    record.remove("id");
    record.insert("userId".to_string(), user_id.clone());
    record.insert("items".to_string(), Value::Array(req.items));
    record.insert("total".to_string(), Value::from(total));
    record.insert("status".to_string(), Value::from("pending"));
    record.insert("createdAt".to_string(), Value::from(chrono::Utc::now().to_rfc3339()));

    let order = state.store.push(Collection::Orders, record).await?;
    clear_cart(&state, &user_id).await?;
    info!(order_id = %order["id"], total, "order placed");

    Ok((StatusCode::CREATED, Json(order)))
}

/// Handler for GET /api/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state
        .store
        .find_one(Collection::Orders, &Filter::new().eq("id", id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

/// Sum of `price * quantity` over `items`, rounded to cents. Missing
/// quantities count as 1; unpriced lines count as 0.
pub fn order_total(items: &[Value]) -> f64 {
    let total: f64 = items
        .iter()
        .map(|item| {
            let price = item.get("price").and_then(number).unwrap_or(0.0);
            let quantity = item.get("quantity").and_then(number).unwrap_or(1.0);
            price * quantity
        })
        .sum();
    (total * 100.0).round() / 100.0
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

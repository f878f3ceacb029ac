//! Cart Handlers
//!
//! One cart record per user: `{id, userId, items: [{productId, quantity, ...}]}`.

use axum::{
    extract::State,
    Json,
};
use serde_json::{json, Map, Value};

use crate::api::{AppState, JsonBody, QueryString};
use crate::db::{loosely_equal, Collection, Filter};
use crate::error::{AppError, Result};
use crate::models::{AddToCartRequest, UpdateCartRequest, UserQuery};

/// Handler for GET /api/cart?userId=
pub async fn get_cart(
    State(state): State<AppState>,
    QueryString(query): QueryString<UserQuery>,
) -> Result<Json<Value>> {
    let user_id = query
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest("userId is required".to_string()))?;

    let cart = state
        .store
        .find_one(Collection::Cart, &Filter::new().eq("userId", user_id.as_str()))
        .await
        .unwrap_or_else(|| json!({ "userId": user_id, "items": [] }));

    Ok(Json(cart))
}

/// Handler for POST /api/cart
///
/// Adds a line to the user's cart, bumping the quantity if the product is
/// already there.
pub async fn add_to_cart(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AddToCartRequest>,
) -> Result<Json<Value>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let mut line = req.extra;
    line.insert("productId".to_string(), req.product_id);
    line.insert("quantity".to_string(), Value::from(req.quantity.unwrap_or(1)));

    let existing = state
        .store
        .find_one(Collection::Cart, &Filter::new().eq("userId", req.user_id.clone()))
        .await;

    let cart = match existing {
        Some(cart) => {
            let mut items = cart_items(&cart);
            merge_line(&mut items, line);
            save_items(&state, &cart, items).await?
        }
        None => {
            let mut record = Map::new();
            record.insert("userId".to_string(), req.user_id);
            record.insert("items".to_string(), Value::Array(vec![Value::Object(line)]));
            state.store.push(Collection::Cart, record).await?
        }
    };

    Ok(Json(cart))
}

/// Handler for PUT /api/cart
///
/// Replaces the user's items wholesale.
pub async fn update_cart(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateCartRequest>,
) -> Result<Json<Value>> {
    if req.user_id.is_null() {
        return Err(AppError::InvalidRequest("userId is required".to_string()));
    }

    let existing = state
        .store
        .find_one(Collection::Cart, &Filter::new().eq("userId", req.user_id.clone()))
        .await;

    let cart = match existing {
        Some(cart) => save_items(&state, &cart, req.items).await?,
        None => {
            let mut record = Map::new();
            record.insert("userId".to_string(), req.user_id);
            record.insert("items".to_string(), Value::Array(req.items));
            state.store.push(Collection::Cart, record).await?
        }
    };

    Ok(Json(cart))
}

/// Empties the cart belonging to `user_id`, if there is one.
pub(crate) async fn clear_cart(state: &AppState, user_id: &Value) -> Result<()> {
    let cart = state
        .store
        .find_one(Collection::Cart, &Filter::new().eq("userId", user_id.clone()))
        .await;
    if let Some(cart) = cart {
        save_items(state, &cart, Vec::new()).await?;
    }
    Ok(())
}

async fn save_items(state: &AppState, cart: &Value, items: Vec<Value>) -> Result<Value> {
    let mut patch = Map::new();
    patch.insert("items".to_string(), Value::Array(items));

    state
        .store
        .assign(Collection::Cart, &cart["id"], patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))
}

fn cart_items(cart: &Value) -> Vec<Value> {
    cart.get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Adds `line` to `items`. A line for the same product has its quantity
/// increased instead of being duplicated; the sum saturates at `u64::MAX`.
pub fn merge_line(items: &mut Vec<Value>, line: Map<String, Value>) {
    let product_id = line.get("productId").cloned().unwrap_or(Value::Null);
    let added = line.get("quantity").and_then(Value::as_u64).unwrap_or(1);

    let existing = items.iter_mut().find(|item| {
        item.get("productId")
            .is_some_and(|id| loosely_equal(id, &product_id))
    });

    match existing {
        Some(item) => {
            let current = item.get("quantity").and_then(Value::as_u64).unwrap_or(0);
            item["quantity"] = Value::from(current.saturating_add(added));
        }
        None => items.push(Value::Object(line)),
    }
}

//! Request DTOs for the storefront API
//!
//! Catalog query strings keep every value as text: they are forwarded to the
//! upstream verbatim. Shop bodies keep unknown fields in `extra` so records
//! round-trip whatever the frontend sends.

use serde::Deserialize;
use serde_json::{Map, Value};

// == Catalog Queries ==

/// Query string for `GET /api/games`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GamesQuery {
    /// Free-text name search, becomes a `name:<term>` filter clause
    pub search: Option<String>,
    /// Platform ids, becomes a `platforms:<ids>` filter clause
    pub platforms: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub field_list: Option<String>,
    /// Raw upstream filter, appended after the generated clauses
    pub filter: Option<String>,
}

/// Query string for `GET /api/games/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameDetailQuery {
    pub field_list: Option<String>,
}

/// Query string shared by reviews, articles, videos and platforms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort: Option<String>,
    pub field_list: Option<String>,
    pub filter: Option<String>,
}

// == Auth ==

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Email and password, when both are present and non-blank.
    ///
    /// The email is trimmed; the password is returned exactly as sent.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = non_empty(&self.email)?;
        non_empty(&self.password)?;
        Some((email, self.password.as_deref()?))
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Any other profile fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegisterRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if non_empty(&self.email).is_none() || non_empty(&self.password).is_none() {
            return Some("Email and password are required".to_string());
        }
        None
    }
}

// == Shop ==

/// `?userId=` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Body of `POST /api/cart`: one line to merge into the user's cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default)]
    pub user_id: Value,
    #[serde(default)]
    pub product_id: Value,
    #[serde(default)]
    pub quantity: Option<u64>,
    /// Denormalised product fields (name, price, image, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddToCartRequest {
    pub fn validate(&self) -> Option<String> {
        if self.user_id.is_null() || self.product_id.is_null() {
            return Some("userId and productId are required".to_string());
        }
        if self.quantity == Some(0) {
            return Some("quantity must be at least 1".to_string());
        }
        None
    }
}

/// Body of `PUT /api/cart`: replaces the user's items.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    #[serde(default)]
    pub user_id: Value,
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewProductRequest {
    pub fn validate(&self) -> Option<String> {
        if non_empty(&self.name).is_none() {
            return Some("Product name is required".to_string());
        }
        match self.price {
            Some(price) if price.is_finite() && price >= 0.0 => None,
            Some(_) => Some("Price must be a non-negative number".to_string()),
            None => Some("Product price is required".to_string()),
        }
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    #[serde(default)]
    pub user_id: Value,
    #[serde(default)]
    pub items: Vec<Value>,
    /// Shipping address, payment method, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewOrderRequest {
    pub fn validate(&self) -> Option<String> {
        if self.user_id.is_null() {
            return Some("userId is required".to_string());
        }
        if self.items.is_empty() {
            return Some("Order must contain at least one item".to_string());
        }
        None
    }
}

/// Body of `POST /api/favorites`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavoriteRequest {
    #[serde(default)]
    pub user_id: Value,
    #[serde(default)]
    pub product_id: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewFavoriteRequest {
    pub fn validate(&self) -> Option<String> {
        if self.user_id.is_null() || self.product_id.is_null() {
            return Some("userId and productId are required".to_string());
        }
        None
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

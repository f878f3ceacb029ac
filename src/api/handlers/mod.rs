//! API Handlers
//!
//! HTTP request handlers for each storefront endpoint.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod orders;
pub mod products;

use axum::Json;

use crate::models::HealthResponse;

pub use auth::{login, register};
pub use cart::{add_to_cart, get_cart, update_cart};
pub use catalog::{get_game, list_articles, list_games, list_platforms, list_reviews, list_videos};
pub use favorites::{create_favorite, delete_favorite, list_favorites};
pub use orders::{create_order, get_order, list_orders};
pub use products::{create_product, get_product, list_products};

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

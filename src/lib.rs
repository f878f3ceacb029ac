//! Storefront - backend for a gaming-goods shop
//!
//! Proxies and caches the GameSpot catalog API and serves users, products,
//! carts, orders and favorites from a flat JSON file.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, Result};

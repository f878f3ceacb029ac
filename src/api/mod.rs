//! API Module
//!
//! HTTP handlers and routing for the storefront REST API.
//!
//! # Endpoints
//! - `/api/games`, `/api/games/:id`, `/api/reviews`, `/api/articles`,
//!   `/api/videos`, `/api/platforms` - cached GameSpot proxy
//! - `/api/cart`, `/api/products`, `/api/orders`, `/api/favorites` - shop data
//! - `/auth/login`, `/auth/register` - accounts
//! - `/health` - Health check endpoint

pub mod extract;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use extract::{JsonBody, QueryString};
pub use rate_limit::{rate_limit_middleware, spawn_pruning_task, IpRateLimiter};
pub use routes::create_router;
pub use state::AppState;

//! API Routes
//!
//! Configures the Axum router with all storefront endpoints.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_to_cart, create_favorite, create_order, create_product, delete_favorite, get_cart,
    get_game, get_order, get_product, health_handler, list_articles, list_favorites, list_games,
    list_orders, list_platforms, list_products, list_reviews, list_videos, login, register,
    update_cart,
};
use super::{rate_limit_middleware, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/games`, `GET /api/games/:id` - GameSpot games (cached)
/// - `GET /api/reviews|articles|videos|platforms` - GameSpot listings (cached)
/// - `GET|POST|PUT /api/cart` - per-user cart
/// - `GET|POST /api/products`, `GET /api/products/:id`
/// - `GET|POST /api/orders`, `GET /api/orders/:id`
/// - `GET|POST /api/favorites`, `DELETE /api/favorites/:id`
/// - `POST /auth/login`, `POST /auth/register`
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Rate limiting: per-IP quota on `/api/*` only
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/games", get(list_games))
        .route("/games/:id", get(get_game))
        .route("/reviews", get(list_reviews))
        .route("/articles", get(list_articles))
        .route("/videos", get(list_videos))
        .route("/platforms", get(list_platforms))
        .route("/cart", get(get_cart).post(add_to_cart).put(update_cart))
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", get(get_product))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/favorites", get(list_favorites).post(create_favorite))
        .route("/favorites/:id", delete(delete_favorite))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .nest("/api", api)
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Integration Tests for Shop and Auth Endpoints
//!
//! Tests full request/response cycle against a scratch datastore.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use storefront::{
    api::{create_router, IpRateLimiter},
    cache::CacheStore,
    db::JsonStore,
    upstream::CatalogProxy,
    AppState, Config,
};
use tempfile::TempDir;
use tokio::sync::RwLock;
use tower::ServiceExt;

// == Helper Functions ==

struct TestApp {
    router: Router,
    dir: TempDir,
}

impl TestApp {
    async fn with_db(contents: Option<Value>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("db.json");
        if let Some(contents) = contents {
            tokio::fs::write(&db_path, contents.to_string()).await.unwrap();
        }

        let config = Config {
            db_path: db_path.clone(),
            ..Config::default()
        };
        let cache = Arc::new(RwLock::new(CacheStore::new(config.cache_ttl)));
        let state = AppState::new(
            CatalogProxy::new(&config, cache).unwrap(),
            JsonStore::open(&db_path).await.unwrap(),
            IpRateLimiter::per_minute(1_000),
        );

        Self {
            router: create_router(state),
            dir,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn disk(&self) -> Value {
        let text = tokio::fs::read_to_string(self.dir.path().join("db.json"))
            .await
            .unwrap();
        serde_json::from_str(&text).unwrap()
    }
}

fn seeded_users() -> Value {
    json!({
        "users": [
            {"id": 1, "email": "a@b.com", "password": "x", "name": "Ann"}
        ]
    })
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::with_db(None).await;

    let (status, json) = app.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"ok": true}));
}

// == Login ==

#[tokio::test]
async fn test_login_success_hides_password() {
    let app = TestApp::with_db(Some(seeded_users())).await;

    let (status, json) = app
        .send("POST", "/auth/login", Some(json!({"email": "a@b.com", "password": "x"})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["user"]["email"], "a@b.com");
    assert_eq!(json["user"]["name"], "Ann");
    assert!(json["user"].get("password").is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::with_db(Some(seeded_users())).await;

    let (status, json) = app
        .send("POST", "/auth/login", Some(json!({"email": "a@b.com", "password": "nope"})))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json, json!({"success": false, "error": "Invalid password"}));
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::with_db(Some(seeded_users())).await;

    let (status, json) = app
        .send("POST", "/auth/login", Some(json!({"email": "who@b.com", "password": "x"})))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json, json!({"success": false, "error": "User not found"}));
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = TestApp::with_db(None).await;

    let (status, json) = app
        .send("POST", "/auth/login", Some(json!({"email": "a@b.com"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let app = TestApp::with_db(Some(seeded_users())).await;

    let (status, json) = app
        .send("POST", "/auth/login", Some(json!({"email": "a@b.com", "password": 5})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["content-type"],
        "application/json",
        "errors are always JSON"
    );
}

// == Register ==

#[tokio::test]
async fn test_register_creates_user() {
    let app = TestApp::with_db(None).await;

    let (status, json) = app
        .send(
            "POST",
            "/auth/register",
            Some(json!({"email": "new@b.com", "password": "pw", "name": "Neo"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["user"]["email"], "new@b.com");
    assert!(json["user"]["id"].is_u64());
    assert!(json["user"].get("password").is_none());

    // The new account can log in straight away.
    let (status, _) = app
        .send("POST", "/auth/login", Some(json!({"email": "new@b.com", "password": "pw"})))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_then_login_with_padded_password() {
    let app = TestApp::with_db(None).await;
    let credentials = json!({"email": "pad@b.com", "password": " pad "});

    let (status, _) = app.send("POST", "/auth/register", Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = app.send("POST", "/auth/login", Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (status, _) = app
        .send("POST", "/auth/login", Some(json!({"email": "pad@b.com", "password": "pad"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_leaves_store_untouched() {
    let app = TestApp::with_db(Some(seeded_users())).await;
    let before = app.disk().await;

    let (status, json) = app
        .send(
            "POST",
            "/auth/register",
            Some(json!({"email": "a@b.com", "password": "other", "name": "Imposter"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({"success": false, "error": "User already exists"}));
    assert_eq!(app.disk().await, before);
}

// == Cart ==

#[tokio::test]
async fn test_cart_merge_flow() {
    let app = TestApp::with_db(None).await;

    let (status, json) = app.send("GET", "/api/cart?userId=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"], json!([]));

    app.send(
        "POST",
        "/api/cart",
        Some(json!({"userId": 1, "productId": 10, "name": "Headset", "price": 49.5})),
    )
    .await;
    let (status, cart) = app
        .send("POST", "/api/cart", Some(json!({"userId": 1, "productId": 10, "quantity": 2})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 3);
    assert_eq!(cart["items"][0]["name"], "Headset");

    let (_, fetched) = app.send("GET", "/api/cart?userId=1", None).await;
    assert_eq!(fetched, cart);
}

#[tokio::test]
async fn test_cart_huge_quantities_do_not_overflow() {
    let app = TestApp::with_db(None).await;
    let line = json!({"userId": 5, "productId": 1, "quantity": u64::MAX});

    app.send("POST", "/api/cart", Some(line.clone())).await;
    let (status, cart) = app.send("POST", "/api/cart", Some(line)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["quantity"], u64::MAX);
}

#[tokio::test]
async fn test_cart_replace_items() {
    let app = TestApp::with_db(None).await;
    app.send("POST", "/api/cart", Some(json!({"userId": 2, "productId": 1})))
        .await;

    let (status, cart) = app
        .send(
            "PUT",
            "/api/cart",
            Some(json!({"userId": 2, "items": [{"productId": 5, "quantity": 1}]})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"], json!([{"productId": 5, "quantity": 1}]));
    assert_eq!(app.disk().await["cart"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cart_requires_user() {
    let app = TestApp::with_db(None).await;

    let (status, _) = app.send("GET", "/api/cart", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send("POST", "/api/cart", Some(json!({"productId": 1})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Products ==

#[tokio::test]
async fn test_products_create_list_get() {
    let app = TestApp::with_db(None).await;

    let (status, created) = app
        .send(
            "POST",
            "/api/products",
            Some(json!({"name": "Arcade Stick", "price": 129.0, "category": "accessories"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["category"], "accessories");
    let id = created["id"].as_u64().unwrap();

    let (_, listed) = app.send("GET", "/api/products?category=accessories", None).await;
    assert_eq!(listed, json!([created.clone()]));

    let (_, none) = app.send("GET", "/api/products?category=consoles", None).await;
    assert_eq!(none, json!([]));

    let (status, fetched) = app.send("GET", &format!("/api/products/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_product_validation_and_missing() {
    let app = TestApp::with_db(None).await;

    let (status, json) = app
        .send("POST", "/api/products", Some(json!({"name": "Free?", "price": -3})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, json) = app.send("GET", "/api/products/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Product not found");
}

// == Orders ==

#[tokio::test]
async fn test_order_is_priced_and_clears_cart() {
    let app = TestApp::with_db(None).await;
    app.send("POST", "/api/cart", Some(json!({"userId": 3, "productId": 1})))
        .await;

    let (status, order) = app
        .send(
            "POST",
            "/api/orders",
            Some(json!({
                "userId": 3,
                "items": [
                    {"productId": 1, "price": 10.25, "quantity": 2},
                    {"productId": 2, "price": 4.5}
                ],
                "shippingAddress": "1 Main St"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["total"], 25.0);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["shippingAddress"], "1 Main St");

    let (_, cart) = app.send("GET", "/api/cart?userId=3", None).await;
    assert_eq!(cart["items"], json!([]));

    let (_, mine) = app.send("GET", "/api/orders?userId=3", None).await;
    assert_eq!(mine, json!([order.clone()]));

    let id = order["id"].as_u64().unwrap();
    let (status, fetched) = app.send("GET", &format!("/api/orders/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, order);
}

#[tokio::test]
async fn test_empty_order_rejected() {
    let app = TestApp::with_db(None).await;

    let (status, _) = app
        .send("POST", "/api/orders", Some(json!({"userId": 3, "items": []})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.disk().await["orders"], json!([]));
}

// == Favorites ==

#[tokio::test]
async fn test_favorites_are_idempotent_and_deletable() {
    let app = TestApp::with_db(None).await;
    let body = json!({"userId": 4, "productId": "game-77"});

    let (status, first) = app.send("POST", "/api/favorites", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, second) = app.send("POST", "/api/favorites", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, first);

    let (_, listed) = app.send("GET", "/api/favorites?userId=4", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let id = first["id"].as_u64().unwrap();
    let (status, json) = app
        .send("DELETE", &format!("/api/favorites/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": true}));

    let (status, _) = app
        .send("DELETE", &format!("/api/favorites/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use catalog_core::item::{category_code, Carat, Category, Gender, Item, ItemType, Metal};
use catalog_db::MemoryItemStore;
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

use catalog_api::auth::jwt::{Claims, JwtConfig};
use catalog_api::config::{parse_origins, ServerConfig};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: parse_origins("http://localhost:5173").unwrap(),
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        database_url: None,
    }
}

/// Build the full application router over the given in-memory store.
///
/// Uses the same builder as `main.rs`, so the middleware stack (CORS,
/// request ID, timeout, tracing, panic recovery) is exercised too.
pub fn build_test_app(store: Arc<MemoryItemStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn token_with_role(role: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "catalogue-admin".to_string(),
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn admin_token() -> String {
    token_with_role("admin")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A gold 22K item created `minutes` after a fixed base time.
pub fn item(seq: u32, main: &str, weight: f64, minutes: i64) -> Item {
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap() + Duration::minutes(minutes);
    let code = category_code(main).unwrap();
    Item {
        id: format!("{code}{seq:03}"),
        name: format!("{main} piece {seq}"),
        category: Category {
            main: main.to_string(),
            sub: None,
        },
        item_type: ItemType::Normal,
        metal: Metal::Gold,
        carat: Carat::K22,
        weight,
        stone_weight: None,
        gender: Gender::Unisex,
        image: None,
        images: Vec::new(),
        videos: Vec::new(),
        is_our_design: true,
        created_at: created,
        updated_at: created,
        click_count: 0,
        order_no: None,
    }
}

/// `n` rings weighing 1..=n grams, newest last.
pub fn rings(n: u32) -> Vec<Item> {
    (1..=n)
        .map(|seq| item(seq, "Rings", f64::from(seq), i64::from(seq)))
        .collect()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response {
    send_json(app, Method::POST, uri, body, token).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response {
    send_json(app, Method::PUT, uri, body, token).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response {
    let mut builder = Request::builder().method(Method::DELETE).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

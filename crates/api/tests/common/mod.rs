#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use pageforge_api::auth::jwt::{generate_access_token, JwtConfig};
use pageforge_api::config::ServerConfig;
use pageforge_api::router::build_app_router;
use pageforge_api::state::AppState;
use pageforge_db::{MemoryStore, RecordStore};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
///
/// No database, no remote site, no revalidation secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        revalidate_secret: None,
        site_url: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Returns the state too so tests can seed data or inspect the render cache.
pub fn build_test_app_with(config: ServerConfig) -> (Router, AppState) {
    build_test_app_over(Arc::new(MemoryStore::new()), config)
}

/// Build the full application router over a caller-supplied store.
pub fn build_test_app_over(
    store: Arc<dyn RecordStore>,
    config: ServerConfig,
) -> (Router, AppState) {
    let state = AppState::new(store, config.clone()).expect("test state should build");
    (build_app_router(state.clone(), &config), state)
}

pub fn build_test_app() -> (Router, AppState) {
    build_test_app_with(test_config())
}

/// A valid editor token for the test JWT secret.
pub fn token() -> String {
    generate_access_token("editor-1", "admin", &test_config().jwt).expect("token should encode")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    auth: bool,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if auth {
        builder = builder.header("authorization", format!("Bearer {}", token()));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, false).await
}

pub async fn get_auth(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, true).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), false).await
}

pub async fn post_json_auth(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), true).await
}

pub async fn put_json_auth(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), true).await
}

pub async fn delete_auth(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, true).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a page through the admin API and return its `data` object.
pub async fn create_page(app: &Router, body: Value) -> Value {
    let response = post_json_auth(app, "/api/v1/pages", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Create a layout under `page_id` and return its `data` object.
pub async fn create_layout(app: &Router, page_id: &str, body: Value) -> Value {
    let response = post_json_auth(app, &format!("/api/v1/pages/{page_id}/layouts"), body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

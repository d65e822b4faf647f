#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use repcount_api::auth::jwt::JwtConfig;
use repcount_api::auth::password::hash_password;
use repcount_api::config::ServerConfig;
use repcount_api::router::build_app_router;
use repcount_api::state::AppState;
use repcount_db::memory::MemoryCredentialStore;
use repcount_db::models::user::{CreateUser, User};
use repcount_db::store::CredentialStore;

/// Build a test `ServerConfig` with safe defaults and fixture secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_timeout_secs: 5,
        cookie_secure: false,
        jwt: JwtConfig {
            access_secret: "integration-access-secret".to_string(),
            refresh_secret: "integration-refresh-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router over an in-memory credential store.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(store: Arc<MemoryCredentialStore>) -> Router {
    let state = AppState::new(store as Arc<dyn CredentialStore>, test_config());
    build_app_router(state)
}

/// A fresh store plus an app over it.
pub fn fresh_app() -> (Arc<MemoryCredentialStore>, Router) {
    let store = Arc::new(MemoryCredentialStore::new());
    let app = build_test_app(Arc::clone(&store));
    (store, app)
}

/// Insert a user with an Argon2 hash of `password`.
pub async fn seed_user(
    store: &MemoryCredentialStore,
    username: &str,
    email: &str,
    password: &str,
) -> User {
    store
        .create_user(&CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).expect("hashing should succeed"),
        })
        .await
        .expect("user creation should succeed")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, &body.to_string()).await
}

/// POST with an arbitrary `Authorization` header value.
pub async fn post_with_authorization(app: Router, uri: &str, authorization: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, authorization)
        .body(Body::from("{}"))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST with `Authorization: Bearer <token>`.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    post_with_authorization(app, uri, &format!("Bearer {token}")).await
}

/// PUT a JSON body, with `Authorization: Bearer <token>` when a token is given.
pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    let mut builder = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

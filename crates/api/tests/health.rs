mod common;

use axum::http::StatusCode;
use common::{body_json, fresh_app, get};

#[tokio::test]
async fn health_reports_ok_with_reachable_store() {
    let (_store, app) = fresh_app();

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store_healthy"], true);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (_store, app) = fresh_app();

    let response = get(app, "/api/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

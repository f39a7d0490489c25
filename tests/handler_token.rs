mod common;

use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use link_shortener::routes::app_router;
use serde_json::{Value, json};
use std::net::SocketAddr;

#[tokio::test]
async fn test_verify_valid_token() {
    let server = common::make_server(common::create_test_state());

    let response = server
        .post("/api/token/verify")
        .json(&json!({ "token": common::token_for("alice") }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["subject"], "alice");
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn test_verify_rejects_garbage() {
    let server = common::make_server(common::create_test_state());

    for token in ["", "abc", "a.b.c"] {
        let response = server
            .post("/api/token/verify")
            .json(&json!({ "token": token }))
            .await;

        response.assert_status_unauthorized();
    }
}

#[tokio::test]
async fn test_verify_rejects_foreign_secret() {
    use link_shortener::application::services::AuthService;
    use link_shortener::domain::entities::UserId;

    let server = common::make_server(common::create_test_state());
    let foreign = AuthService::new("another-secret".to_string())
        .issue(&UserId::new("alice"), chrono::Duration::minutes(5));

    let response = server
        .post("/api/token/verify")
        .json(&json!({ "token": foreign }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_verify_is_rate_limited_per_forwarded_client() {
    let app = ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(
        app_router(common::create_test_state(), true),
    );
    let server = TestServer::builder().http_transport().build(app).unwrap();
    let token = common::token_for("alice");

    for _ in 0..10 {
        server
            .post("/api/token/verify")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .json(&json!({ "token": token }))
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/api/token/verify")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .json(&json!({ "token": token }))
        .await;

    assert_eq!(response.status_code(), 429);

    // Another forwarded client has its own bucket.
    server
        .post("/api/token/verify")
        .add_header("X-Forwarded-For", "198.51.100.9")
        .json(&json!({ "token": token }))
        .await
        .assert_status_ok();
}

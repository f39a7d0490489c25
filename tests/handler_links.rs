mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_anonymous() {
    let server = common::make_server(common::create_test_state());

    let response = server
        .post("/api/link/shortener")
        .json(&json!({ "source_link": "https://example.com/some/Path?q=1" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    let hash = body["hash"].as_str().unwrap();
    assert_eq!(body["source_link"], "https://example.com/some/Path?q=1");
    assert_eq!(body["short_url"], format!("{}/{}", common::BASE_URL, hash));
    assert!(body.get("created_at").is_some());
    assert!(body.get("owner").is_none());
    assert_eq!(hash.len(), 8);
    assert!(hash.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_create_link_invalid_url() {
    let server = common::make_server(common::create_test_state());

    for source_link in ["not-a-url", "ftp://example.com/file", "javascript:alert(1)", ""] {
        let response = server
            .post("/api/link/shortener")
            .json(&json!({ "source_link": source_link }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_eq!(body["error"]["code"], "validation_error", "{source_link}");
    }
}

#[tokio::test]
async fn test_create_link_with_invalid_token_is_unauthorized() {
    let server = common::make_server(common::create_test_state());

    let response = server
        .post("/api/link/shortener")
        .add_header("Authorization", "Bearer not.a.token")
        .json(&json!({ "source_link": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_same_url_twice_gets_two_hashes() {
    let server = common::make_server(common::create_test_state());

    let first = common::create_link(&server, "https://example.com", None).await;
    let second = common::create_link(&server, "https://example.com", None).await;

    assert_ne!(first, second);
}

// ─── GET ONE ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_link_roundtrip() {
    let server = common::make_server(common::create_test_state());
    let hash = common::create_link(&server, "https://example.com/a", Some("alice")).await;

    let response = server.get(&format!("/api/link/get-link/{hash}")).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["hash"], hash);
    assert_eq!(body["source_link"], "https://example.com/a");
}

#[tokio::test]
async fn test_get_link_not_found() {
    let server = common::make_server(common::create_test_state());

    let response = server.get("/api/link/get-link/nonexistent").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_get_link_ignores_bad_token() {
    let server = common::make_server(common::create_test_state());
    let hash = common::create_link(&server, "https://example.com/b", None).await;

    let response = server
        .get(&format!("/api/link/get-link/{hash}"))
        .add_header("Authorization", "Bearer garbage")
        .await;

    response.assert_status_ok();
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_links_in_creation_order() {
    let server = common::make_server(common::create_test_state());

    let first = common::create_link(&server, "https://example.com/1", Some("u1")).await;
    common::create_link(&server, "https://example.com/other", Some("u2")).await;
    common::create_link(&server, "https://example.com/anon", None).await;
    let second = common::create_link(&server, "https://example.com/2", Some("u1")).await;

    let response = server
        .get("/api/link/get-links")
        .add_header("Authorization", common::bearer("u1"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Vec<Value>>();
    let hashes: Vec<&str> = body.iter().map(|l| l["hash"].as_str().unwrap()).collect();
    assert_eq!(hashes, vec![first.as_str(), second.as_str()]);
    assert_eq!(body[0]["source_link"], "https://example.com/1");
    assert_eq!(body[1]["source_link"], "https://example.com/2");
}

#[tokio::test]
async fn test_get_links_empty_for_new_user() {
    let server = common::make_server(common::create_test_state());
    common::create_link(&server, "https://example.com/1", Some("u1")).await;

    let response = server
        .get("/api/link/get-links")
        .add_header("Authorization", common::bearer("u2"))
        .await;

    response.assert_status_ok();
    assert!(response.json::<Vec<Value>>().is_empty());
}

#[tokio::test]
async fn test_get_links_requires_token() {
    let server = common::make_server(common::create_test_state());

    let response = server.get("/api/link/get-links").await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_get_links_with_expired_token() {
    use link_shortener::application::services::AuthService;
    use link_shortener::domain::entities::UserId;

    let server = common::make_server(common::create_test_state());
    let expired = AuthService::new(common::TEST_SECRET.to_string())
        .issue(&UserId::new("u1"), chrono::Duration::seconds(-10));

    let response = server
        .get("/api/link/get-links")
        .add_header("Authorization", format!("Bearer {expired}"))
        .await;

    response.assert_status_unauthorized();
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_link_by_owner() {
    let server = common::make_server(common::create_test_state());
    let hash = common::create_link(&server, "https://example.com/del", Some("owner")).await;

    let response = server
        .delete(&format!("/api/link/delete-link/{hash}"))
        .add_header("Authorization", common::bearer("owner"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["hash"], hash);
    assert!(body["message"].is_string());

    server
        .get(&format!("/api/link/get-link/{hash}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_twice() {
    let server = common::make_server(common::create_test_state());
    let hash = common::create_link(&server, "https://example.com/del", Some("owner")).await;

    server
        .delete(&format!("/api/link/delete-link/{hash}"))
        .add_header("Authorization", common::bearer("owner"))
        .await
        .assert_status_ok();

    let response = server
        .delete(&format!("/api/link/delete-link/{hash}"))
        .add_header("Authorization", common::bearer("owner"))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_of_other_owner() {
    let server = common::make_server(common::create_test_state());
    let hash = common::create_link(&server, "https://example.com/b", Some("bob")).await;

    let response = server
        .delete(&format!("/api/link/delete-link/{hash}"))
        .add_header("Authorization", common::bearer("alice"))
        .await;

    response.assert_status_unauthorized();

    server
        .get(&format!("/api/link/get-link/{hash}"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_delete_anonymous_link() {
    let server = common::make_server(common::create_test_state());
    let hash = common::create_link(&server, "https://example.com/anon", None).await;

    let response = server
        .delete(&format!("/api/link/delete-link/{hash}"))
        .add_header("Authorization", common::bearer("anyone"))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_delete_requires_token() {
    let server = common::make_server(common::create_test_state());
    let hash = common::create_link(&server, "https://example.com/x", Some("owner")).await;

    let response = server.delete(&format!("/api/link/delete-link/{hash}")).await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_delete_unknown_link() {
    let server = common::make_server(common::create_test_state());

    let response = server
        .delete("/api/link/delete-link/unknown1")
        .add_header("Authorization", common::bearer("owner"))
        .await;

    response.assert_status_not_found();
}

mod common;

use std::sync::Arc;

#[tokio::test]
async fn test_redirect_success() {
    let server = common::make_server(common::create_test_state());
    let hash = common::create_link(&server, "https://example.com/target", None).await;

    let response = server.get(&format!("/{hash}")).await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let server = common::make_server(common::create_test_state());

    let response = server.get("/notfound").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_malformed_hash() {
    let server = common::make_server(common::create_test_state());

    let response = server.get("/not-a-hash!").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_fills_cache() {
    let cache = Arc::new(common::MapCache::default());
    let server = common::make_server(common::create_test_state_with_cache(cache.clone()));
    let hash = common::create_link(&server, "https://example.com/cached", None).await;

    assert_eq!(server.get(&format!("/{hash}")).await.status_code(), 307);

    common::wait_for_cache(&cache, &hash).await;
    assert_eq!(
        cache.entries.get(&hash).map(|e| e.value().clone()),
        Some("https://example.com/cached".to_string())
    );
}

#[tokio::test]
async fn test_redirect_served_from_cache() {
    let cache = Arc::new(common::MapCache::default());
    cache
        .entries
        .insert("onlycach".to_string(), "https://cache.example.com".to_string());
    let server = common::make_server(common::create_test_state_with_cache(cache));

    let response = server.get("/onlycach").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://cache.example.com");
}

#[tokio::test]
async fn test_deleted_link_stops_redirecting() {
    let cache = Arc::new(common::MapCache::default());
    let server = common::make_server(common::create_test_state_with_cache(cache.clone()));
    let hash = common::create_link(&server, "https://example.com/gone", Some("owner")).await;

    assert_eq!(server.get(&format!("/{hash}")).await.status_code(), 307);
    common::wait_for_cache(&cache, &hash).await;

    server
        .delete(&format!("/api/link/delete-link/{hash}"))
        .add_header("Authorization", common::bearer("owner"))
        .await
        .assert_status_ok();

    assert!(!cache.entries.contains_key(&hash));
    server.get(&format!("/{hash}")).await.assert_status_not_found();
}

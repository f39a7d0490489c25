#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use axum_test::TestServer;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

use link_shortener::api::handlers::{health_handler, redirect_handler};
use link_shortener::api::routes::{link_routes, token_routes};
use link_shortener::application::services::{AuthService, ShortenerService};
use link_shortener::domain::entities::UserId;
use link_shortener::infrastructure::cache::{CacheResult, CacheService, NullCache};
use link_shortener::infrastructure::persistence::InMemoryLinkRepository;
use link_shortener::state::AppState;
use link_shortener::utils::hash_generator::RandomHashGenerator;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://sho.rt";

/// Cache kept in a map so tests can observe fills and evictions.
#[derive(Default)]
pub struct MapCache {
    pub entries: DashMap<String, String>,
}

#[async_trait]
impl CacheService for MapCache {
    async fn get_source(&self, hash: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.get(hash).map(|e| e.value().clone()))
    }

    async fn set_source(
        &self,
        hash: &str,
        source_link: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.entries.insert(hash.to_string(), source_link.to_string());
        Ok(())
    }

    async fn invalidate(&self, hash: &str) -> CacheResult<()> {
        self.entries.remove(hash);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "map"
    }
}

pub fn create_test_state() -> AppState {
    create_test_state_with_cache(Arc::new(NullCache::new()))
}

pub fn create_test_state_with_cache(cache: Arc<dyn CacheService>) -> AppState {
    let shortener = Arc::new(ShortenerService::new(
        Arc::new(InMemoryLinkRepository::new()),
        Arc::new(RandomHashGenerator::default()),
    ));
    let auth_service = Arc::new(AuthService::new(TEST_SECRET.to_string()));

    AppState::new(shortener, auth_service, cache, BASE_URL)
}

/// Full route table without rate limiting.
pub fn make_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/{hash}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api/link", link_routes())
        .nest("/api/token", token_routes())
        .with_state(state);

    TestServer::new(app).unwrap()
}

pub fn token_for(subject: &str) -> String {
    AuthService::new(TEST_SECRET.to_string())
        .issue(&UserId::new(subject), chrono::Duration::minutes(10))
}

pub fn bearer(subject: &str) -> String {
    format!("Bearer {}", token_for(subject))
}

/// Creates a link through the API and returns its hash.
pub async fn create_link(server: &TestServer, source_link: &str, subject: Option<&str>) -> String {
    let mut request = server
        .post("/api/link/shortener")
        .json(&serde_json::json!({ "source_link": source_link }));

    if let Some(subject) = subject {
        request = request.add_header("Authorization", bearer(subject));
    }

    let response = request.await;
    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<serde_json::Value>()["hash"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Waits for a background cache fill to land.
pub async fn wait_for_cache(cache: &MapCache, hash: &str) {
    for _ in 0..100 {
        if cache.entries.contains_key(hash) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("cache was never filled for {hash}");
}

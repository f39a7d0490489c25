//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, RedirectResolver, ShortenerService};
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    pub resolver: Arc<RedirectResolver>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
    /// Prefix for `short_url` in responses, without a trailing slash.
    pub public_base_url: String,
}

impl AppState {
    /// Wires the redirect resolver on top of the shortener and cache.
    pub fn new(
        shortener: Arc<ShortenerService>,
        auth_service: Arc<AuthService>,
        cache: Arc<dyn CacheService>,
        public_base_url: impl Into<String>,
    ) -> Self {
        let resolver = Arc::new(RedirectResolver::new(shortener.clone(), cache.clone()));
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();

        Self {
            shortener,
            resolver,
            auth_service,
            cache,
            public_base_url,
        }
    }

    /// Public URL that redirects to the link with this hash.
    pub fn short_url(&self, hash: &str) -> String {
        format!("{}/{}", self.public_base_url, hash)
    }
}

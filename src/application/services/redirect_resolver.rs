//! Hash to destination resolution for the public redirect path.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::application::services::shortener_service::ShortenerService;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Resolves short hashes to their source links.
///
/// Lookups go through the cache first. On a miss the link store is consulted
/// and the cache is filled in the background, so a slow cache never delays
/// a redirect. Cache failures degrade to store lookups.
///
/// A fill re-reads the store after writing and drops the entry if the link
/// is gone by then, so a fill racing a delete cannot outlive the delete.
pub struct RedirectResolver {
    shortener: Arc<ShortenerService>,
    cache: Arc<dyn CacheService>,
}

impl RedirectResolver {
    pub fn new(shortener: Arc<ShortenerService>, cache: Arc<dyn CacheService>) -> Self {
        Self { shortener, cache }
    }

    /// Returns the source link for `hash`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live link has this hash.
    pub async fn resolve(&self, hash: &str) -> Result<String, AppError> {
        match self.cache.get_source(hash).await {
            Ok(Some(source_link)) => {
                debug!(hash, "Cache HIT");
                return Ok(source_link);
            }
            Ok(None) => debug!(hash, "Cache MISS"),
            Err(e) => warn!(hash, error = %e, "Cache lookup failed, falling back to store"),
        }

        let link = self.shortener.get(hash).await?;

        let cache = self.cache.clone();
        let shortener = self.shortener.clone();
        let hash = link.hash.clone();
        let source_link = link.source_link.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.set_source(&hash, &source_link, None).await {
                error!(hash = %hash, error = %e, "Failed to cache source link");
                return;
            }

            // A delete may have run its eviction before this fill landed.
            if let Err(AppError::NotFound { .. }) = shortener.get(&hash).await {
                debug!(hash = %hash, "Link deleted during cache fill, evicting");
                if let Err(e) = cache.invalidate(&hash).await {
                    error!(hash = %hash, error = %e, "Failed to evict cached link");
                }
            }
        });

        Ok(link.source_link)
    }

    /// Drops any cached destination for `hash`.
    ///
    /// Called after a delete so that a removed link stops resolving.
    pub async fn evict(&self, hash: &str) {
        if let Err(e) = self.cache.invalidate(hash).await {
            error!(hash, error = %e, "Failed to evict cached link");
        }
    }
}

//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache for `hash -> source_link` mappings on the redirect path.
///
/// Implementations must be thread-safe and degrade to a miss on failure; the
/// link store stays the source of truth.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up the source link cached for `hash`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_source(&self, hash: &str) -> CacheResult<Option<String>>;

    /// Caches `source_link` under `hash`.
    ///
    /// `ttl_seconds = None` uses the implementation default.
    async fn set_source(
        &self,
        hash: &str,
        source_link: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Removes the cached mapping for `hash`.
    ///
    /// Called after a link is deleted.
    async fn invalidate(&self, hash: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;
}

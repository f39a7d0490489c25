//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink, UserId};
use async_trait::async_trait;
use std::time::Duration;

/// Failures reported by a link store.
///
/// The store keeps `Forbidden` distinct from `NotFound` so ownership
/// violations can be audited; the service layer decides how to surface them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("hash is already taken")]
    DuplicateHash,

    #[error("link not found")]
    NotFound,

    #[error("link is not owned by the requester")]
    Forbidden,

    #[error("store call exceeded {0:?}")]
    Timeout(Duration),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Repository interface for short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a link if its hash is not taken yet.
    ///
    /// The check and the write are one atomic step, enforced by the backend
    /// itself. Of several concurrent inserts with the same hash exactly one
    /// succeeds; hashes of deleted links count as taken.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateHash`] if the hash exists.
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Fetches a live link by hash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown or deleted hashes.
    async fn get(&self, hash: &str) -> Result<Link, StoreError>;

    /// Lists the live links of `owner` in insertion order.
    ///
    /// An owner without links yields an empty vector.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Link>, StoreError>;

    /// Deletes a link on behalf of `requester`.
    ///
    /// The hash stays reserved afterwards.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the hash is unknown or already deleted
    /// - [`StoreError::Forbidden`] if the link is anonymous or owned by someone else
    async fn delete(&self, hash: &str, requester: &UserId) -> Result<(), StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

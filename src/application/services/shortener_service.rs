//! Link creation, lookup, listing and deletion.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Caller, Link, NewLink, UserId};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::error::AppError;
use crate::utils::hash_generator::{HashGenerator, is_reserved_hash, is_well_formed_hash};
use crate::utils::url_validator::validate_source_link;

/// Default number of candidate hashes tried per create.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default deadline for a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Service orchestrating the link lifecycle.
///
/// Every operation takes the caller explicitly. Ownership rules:
/// - anyone may read any live link by hash
/// - only identified callers may list or delete
/// - only the owner may delete, and anonymous links are never deletable
pub struct ShortenerService {
    repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn HashGenerator>,
    max_attempts: u32,
    store_timeout: Duration,
}

impl ShortenerService {
    /// Creates a new shortener service with default limits.
    pub fn new(repository: Arc<dyn LinkRepository>, generator: Arc<dyn HashGenerator>) -> Self {
        Self {
            repository,
            generator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Sets how many candidate hashes a create may try. At least one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the deadline applied to every store call.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Shortens `source_link` on behalf of `caller`.
    ///
    /// The link is owned by the caller's identity, or by nobody for anonymous
    /// callers. A fresh random hash is drawn for each attempt; the store's
    /// atomic insert decides whether it is free. Hashes that collide with a
    /// static route are skipped and count as an attempt.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is not an absolute `http(s)` URL
    /// - [`AppError::HashSpaceExhausted`] if every attempt collided
    /// - [`AppError::ServiceUnavailable`] if the store fails or times out
    pub async fn create(&self, source_link: String, caller: &Caller) -> Result<Link, AppError> {
        validate_source_link(&source_link)?;

        let owner = caller.user().cloned();

        for attempt in 1..=self.max_attempts {
            let hash = self.generator.generate();
            if is_reserved_hash(&hash) {
                debug!(hash = %hash, attempt, "Skipped reserved hash");
                continue;
            }

            let new_link = NewLink {
                hash: hash.clone(),
                source_link: source_link.clone(),
                owner: owner.clone(),
            };

            match self.call_store(self.repository.insert(new_link)).await {
                Ok(link) => {
                    info!(hash = %link.hash, attempt, owned = owner.is_some(), "Link created");
                    return Ok(link);
                }
                Err(StoreError::DuplicateHash) => {
                    metrics::counter!("link_hash_collisions_total").increment(1);
                    warn!(hash = %hash, attempt, max_attempts = self.max_attempts, "Hash collision");
                }
                Err(e) => return Err(self.store_failure("insert", e)),
            }
        }

        metrics::counter!("link_hash_space_exhausted_total").increment(1);
        error!(
            attempts = self.max_attempts,
            "No free hash found, hash space exhausted or store misbehaving"
        );

        Err(AppError::HashSpaceExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Fetches a live link by hash. No ownership check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown, deleted or malformed hashes.
    pub async fn get(&self, hash: &str) -> Result<Link, AppError> {
        if !is_well_formed_hash(hash) {
            debug!(hash, "Rejected malformed hash without lookup");
            return Err(link_not_found(hash));
        }

        match self.call_store(self.repository.get(hash)).await {
            Ok(link) => Ok(link),
            Err(StoreError::NotFound) => Err(link_not_found(hash)),
            Err(e) => Err(self.store_failure("get", e)),
        }
    }

    /// Lists the caller's links in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for anonymous callers.
    pub async fn list(&self, caller: &Caller) -> Result<Vec<Link>, AppError> {
        let owner = require_identity(caller)?;

        self.call_store(self.repository.list_by_owner(owner))
            .await
            .map_err(|e| self.store_failure("list_by_owner", e))
    }

    /// Deletes a link owned by the caller.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] for anonymous callers and for links the
    ///   caller does not own (anonymous links included)
    /// - [`AppError::NotFound`] if the hash is unknown or already deleted
    pub async fn delete(&self, hash: &str, caller: &Caller) -> Result<(), AppError> {
        let requester = require_identity(caller)?;

        if !is_well_formed_hash(hash) {
            return Err(link_not_found(hash));
        }

        match self.call_store(self.repository.delete(hash, requester)).await {
            Ok(()) => {
                info!(hash, owner = %requester, "Link deleted");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(link_not_found(hash)),
            Err(StoreError::Forbidden) => {
                warn!(hash, requester = %requester, "Delete denied: caller does not own link");
                Err(AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Link is not owned by the caller", "hash": hash }),
                ))
            }
            Err(e) => Err(self.store_failure("delete", e)),
        }
    }

    /// Checks that the link store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.call_store(self.repository.ping())
            .await
            .map_err(|e| self.store_failure("ping", e))
    }

    /// Runs one store call under the configured deadline.
    ///
    /// A call cut off by the deadline is dropped; inserts are atomic per
    /// attempt, so nothing partial is left behind.
    async fn call_store<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .unwrap_or(Err(StoreError::Timeout(self.store_timeout)))
    }

    fn store_failure(&self, operation: &'static str, e: StoreError) -> AppError {
        error!(operation, error = %e, "Link store call failed");
        AppError::from(e)
    }
}

fn require_identity(caller: &Caller) -> Result<&UserId, AppError> {
    caller.user().ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "This operation requires an authenticated user" }),
        )
    })
}

fn link_not_found(hash: &str) -> AppError {
    AppError::not_found("Link not found", json!({ "hash": hash }))
}

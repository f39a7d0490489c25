//! Process-local implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Link, NewLink, UserId};
use crate::domain::repositories::{LinkRepository, StoreError};

struct StoredLink {
    link: Link,
    deleted: bool,
}

/// In-memory link store for single-node deployments and tests.
///
/// Insert-if-absent rides on the per-key entry lock of [`DashMap`], so there
/// is no store-wide lock. Deleted links stay in the map as tombstones.
///
/// Lock order is always `links` before `owners`.
pub struct InMemoryLinkRepository {
    links: DashMap<String, StoredLink>,
    owners: DashMap<UserId, Vec<String>>,
    next_seq: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            owners: DashMap::new(),
            next_seq: AtomicI64::new(1),
        }
    }

    /// Number of stored hashes, tombstones included.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError> {
        match self.links.entry(new_link.hash.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateHash),
            Entry::Vacant(slot) => {
                let link = Link::new(
                    new_link.hash,
                    new_link.source_link,
                    new_link.owner,
                    self.next_seq.fetch_add(1, Ordering::SeqCst),
                    Utc::now(),
                );

                if let Some(owner) = &link.owner {
                    self.owners
                        .entry(owner.clone())
                        .or_default()
                        .push(link.hash.clone());
                }

                slot.insert(StoredLink {
                    link: link.clone(),
                    deleted: false,
                });

                Ok(link)
            }
        }
    }

    async fn get(&self, hash: &str) -> Result<Link, StoreError> {
        match self.links.get(hash) {
            Some(stored) if !stored.deleted => Ok(stored.link.clone()),
            _ => Err(StoreError::NotFound),
        }
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Link>, StoreError> {
        let hashes = match self.owners.get(owner) {
            Some(hashes) => hashes.clone(),
            None => return Ok(Vec::new()),
        };

        let mut links: Vec<Link> = hashes
            .iter()
            .filter_map(|hash| {
                self.links
                    .get(hash)
                    .filter(|stored| !stored.deleted)
                    .map(|stored| stored.link.clone())
            })
            .collect();

        // Concurrent inserts may append to the owner index out of seq order.
        links.sort_by_key(|link| link.seq);

        Ok(links)
    }

    async fn delete(&self, hash: &str, requester: &UserId) -> Result<(), StoreError> {
        let mut stored = match self.links.get_mut(hash) {
            Some(stored) if !stored.deleted => stored,
            _ => return Err(StoreError::NotFound),
        };

        if !stored.link.is_owned_by(requester) {
            return Err(StoreError::Forbidden);
        }

        stored.deleted = true;

        if let Some(mut hashes) = self.owners.get_mut(requester) {
            hashes.retain(|h| h != hash);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

use super::identity::UserId;

/// A persisted short link.
///
/// `hash` is the primary key and is never reassigned, not even after the link
/// is deleted. `seq` is the store-assigned insertion order and is what
/// "creation order" means for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub hash: String,
    pub source_link: String,
    pub owner: Option<UserId>,
    pub seq: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        hash: String,
        source_link: String,
        owner: Option<UserId>,
        seq: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            hash,
            source_link,
            owner,
            seq,
            created_at,
        }
    }

    /// Returns true if `user` owns this link.
    ///
    /// Anonymous links are owned by nobody.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner.as_ref() == Some(user)
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub hash: String,
    pub source_link: String,
    pub owner: Option<UserId>,
}

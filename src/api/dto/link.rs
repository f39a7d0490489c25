//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a URL.
///
/// Only the length is checked here; the URL itself is validated by the
/// shortener so every entry point applies the same rules.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    // Matches `url_validator::MAX_SOURCE_LINK_LENGTH`.
    #[validate(length(min = 1, max = 2048))]
    pub source_link: String,
}

/// Public view of a link. The owner is never exposed.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub hash: String,
    pub source_link: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            hash: link.hash,
            source_link: link.source_link,
            short_url,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub message: String,
    pub hash: String,
}

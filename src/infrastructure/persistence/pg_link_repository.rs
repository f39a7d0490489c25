//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink, UserId};
use crate::domain::repositories::{LinkRepository, StoreError};

/// PostgreSQL repository for link storage and retrieval.
///
/// Hash uniqueness is enforced by the `links` primary key; inserts use
/// `ON CONFLICT DO NOTHING` so a collision is an empty result rather than an
/// error. Deletion sets `deleted_at` and keeps the row, which keeps the hash
/// reserved.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    hash: String,
    source_link: String,
    owner: Option<String>,
    seq: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(
            row.hash,
            row.source_link,
            row.owner.map(UserId::new),
            row.seq,
            row.created_at,
        )
    }
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::DuplicateHash;
    }

    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (hash, source_link, owner)
            VALUES ($1, $2, $3)
            ON CONFLICT (hash) DO NOTHING
            RETURNING hash, source_link, owner, seq, created_at
            "#,
        )
        .bind(&new_link.hash)
        .bind(&new_link.source_link)
        .bind(new_link.owner.as_ref().map(UserId::as_str))
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        row.map(Link::from).ok_or(StoreError::DuplicateHash)
    }

    async fn get(&self, hash: &str) -> Result<Link, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT hash, source_link, owner, seq, created_at
            FROM links
            WHERE hash = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(hash)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        row.map(Link::from).ok_or(StoreError::NotFound)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Link>, StoreError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT hash, source_link, owner, seq, created_at
            FROM links
            WHERE owner = $1 AND deleted_at IS NULL
            ORDER BY seq ASC
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete(&self, hash: &str, requester: &UserId) -> Result<(), StoreError> {
        let deleted = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE links
            SET deleted_at = NOW()
            WHERE hash = $1 AND owner = $2 AND deleted_at IS NULL
            RETURNING hash
            "#,
        )
        .bind(hash)
        .bind(requester.as_str())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        if deleted.is_some() {
            return Ok(());
        }

        // Nothing matched: tell a missing link apart from someone else's.
        let live = sqlx::query_scalar::<_, i64>(
            "SELECT seq FROM links WHERE hash = $1 AND deleted_at IS NULL",
        )
        .bind(hash)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        match live {
            Some(_) => Err(StoreError::Forbidden),
            None => Err(StoreError::NotFound),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}

//! PostgreSQL repository tests.
//!
//! `#[sqlx::test]` creates a fresh database per test from `DATABASE_URL` and
//! applies `migrations/` before each one.

use link_shortener::domain::entities::{NewLink, UserId};
use link_shortener::domain::repositories::{LinkRepository, StoreError};
use link_shortener::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_link(hash: &str, url: &str, owner: Option<&str>) -> NewLink {
    NewLink {
        hash: hash.to_string(),
        source_link: url.to_string(),
        owner: owner.map(UserId::new),
    }
}

#[sqlx::test]
async fn test_insert_and_get(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .insert(new_link("abc12345", "https://example.com", Some("alice")))
        .await
        .unwrap();

    assert_eq!(link.hash, "abc12345");
    assert_eq!(link.owner, Some(UserId::new("alice")));

    let fetched = repo.get("abc12345").await.unwrap();
    assert_eq!(fetched, link);
}

#[sqlx::test]
async fn test_insert_duplicate_hash(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(new_link("dup00001", "https://first.example.com", None))
        .await
        .unwrap();
    let result = repo
        .insert(new_link("dup00001", "https://second.example.com", None))
        .await;

    assert_eq!(result, Err(StoreError::DuplicateHash));
    assert_eq!(
        repo.get("dup00001").await.unwrap().source_link,
        "https://first.example.com"
    );
}

#[sqlx::test]
async fn test_get_missing(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert_eq!(repo.get("missing1").await, Err(StoreError::NotFound));
}

#[sqlx::test]
async fn test_list_by_owner_in_insertion_order(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(new_link("list0003", "https://example.com/1", Some("u1")))
        .await
        .unwrap();
    repo.insert(new_link("list0001", "https://example.com/x", Some("u2")))
        .await
        .unwrap();
    repo.insert(new_link("list0002", "https://example.com/2", Some("u1")))
        .await
        .unwrap();

    let links = repo.list_by_owner(&UserId::new("u1")).await.unwrap();
    let hashes: Vec<&str> = links.iter().map(|l| l.hash.as_str()).collect();

    assert_eq!(hashes, vec!["list0003", "list0002"]);
    assert!(repo.list_by_owner(&UserId::new("u3")).await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_delete_rules(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    repo.insert(new_link("owned001", "https://example.com", Some("alice")))
        .await
        .unwrap();
    repo.insert(new_link("anon0001", "https://example.com", None))
        .await
        .unwrap();

    assert_eq!(repo.delete("owned001", &bob).await, Err(StoreError::Forbidden));
    assert_eq!(repo.delete("anon0001", &alice).await, Err(StoreError::Forbidden));
    assert_eq!(repo.delete("missing1", &alice).await, Err(StoreError::NotFound));

    repo.delete("owned001", &alice).await.unwrap();

    assert_eq!(repo.get("owned001").await, Err(StoreError::NotFound));
    assert_eq!(repo.delete("owned001", &alice).await, Err(StoreError::NotFound));
    assert!(repo.list_by_owner(&alice).await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_deleted_hash_is_never_reused(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let alice = UserId::new("alice");

    repo.insert(new_link("reuse001", "https://old.example.com", Some("alice")))
        .await
        .unwrap();
    repo.delete("reuse001", &alice).await.unwrap();

    let result = repo
        .insert(new_link("reuse001", "https://new.example.com", Some("alice")))
        .await;

    assert_eq!(result, Err(StoreError::DuplicateHash));
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}

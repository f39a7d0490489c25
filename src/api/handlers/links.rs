//! Handlers for link endpoints (create, get, list, delete).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, DeleteLinkResponse, LinkResponse};
use crate::api::extract::Authentication;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/link/shortener`
///
/// # Request Body
///
/// ```json
/// { "source_link": "https://example.com/some/long/path" }
/// ```
///
/// # Authentication
///
/// Optional. With a valid bearer token the link is owned by the token subject
/// and can later be listed and deleted. Without one the link is anonymous.
///
/// # Errors
///
/// - 400 if `source_link` is not an absolute `http(s)` URL
/// - 401 if a bearer token is presented but invalid
/// - 500 if no free hash could be found
/// - 503 if the link store is unavailable
pub async fn create_link_handler(
    State(state): State<AppState>,
    auth: Authentication,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;
    let caller = auth.caller_strict()?;

    let link = state.shortener.create(payload.source_link, &caller).await?;
    let short_url = state.short_url(&link.hash);

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, short_url)),
    ))
}

/// Returns a link by hash. Anyone who knows the hash may read it.
///
/// # Endpoint
///
/// `GET /api/link/get-link/{hash}`
///
/// # Errors
///
/// Returns 404 if the hash is unknown or the link was deleted.
pub async fn get_link_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.shortener.get(&hash).await?;
    let short_url = state.short_url(&link.hash);

    Ok(Json(LinkResponse::from_link(link, short_url)))
}

/// Lists the caller's links in creation order.
///
/// # Endpoint
///
/// `GET /api/link/get-links`
///
/// # Errors
///
/// Returns 401 without a valid bearer token.
pub async fn get_links_handler(
    State(state): State<AppState>,
    auth: Authentication,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let caller = auth.caller_strict()?;

    let links = state.shortener.list(&caller).await?;

    let body = links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.hash);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(body))
}

/// Deletes a link owned by the caller.
///
/// The hash stays reserved and is never handed out again. Any cached
/// redirect for it is evicted.
///
/// # Endpoint
///
/// `DELETE /api/link/delete-link/{hash}`
///
/// # Errors
///
/// - 401 without a valid bearer token, or when the caller does not own the link
/// - 404 if the hash is unknown or already deleted
pub async fn delete_link_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
    auth: Authentication,
) -> Result<Json<DeleteLinkResponse>, AppError> {
    let caller = auth.caller_strict()?;

    state.shortener.delete(&hash, &caller).await?;
    state.resolver.evict(&hash).await;

    Ok(Json(DeleteLinkResponse {
        message: "Link deleted".to_string(),
        hash,
    }))
}

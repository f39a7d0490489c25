//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short hash to its source link.
///
/// # Endpoint
///
/// `GET /{hash}`
///
/// # Request Flow
///
/// 1. Check cache for the hash
/// 2. On cache miss, query the link store
/// 3. Asynchronously fill the cache
/// 4. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns 404 Not Found if the hash is unknown or the link was deleted.
pub async fn redirect_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let source_link = state.resolver.resolve(&hash).await?;

    Ok(Redirect::temporary(&source_link))
}

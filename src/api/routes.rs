//! API route configuration.
//!
//! Routes here carry no rate limiting; [`crate::routes::app_router`] adds it.
//! Authentication is per handler through [`crate::api::extract::Authentication`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, get_links_handler,
    verify_token_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Link management routes, nested under `/api/link`.
///
/// # Endpoints
///
/// - `POST   /shortener`           - Create a short link (optional bearer)
/// - `GET    /get-link/{hash}`     - Fetch a link by hash (public)
/// - `GET    /get-links`           - List the caller's links (bearer required)
/// - `DELETE /delete-link/{hash}`  - Delete an owned link (bearer required)
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/shortener", post(create_link_handler))
        .route("/get-link/{hash}", get(get_link_handler))
        .route("/get-links", get(get_links_handler))
        .route("/delete-link/{hash}", delete(delete_link_handler))
}

/// Token routes, nested under `/api/token`.
///
/// - `POST /verify` - Verify a bearer token
pub fn token_routes() -> Router<AppState> {
    Router::new().route("/verify", post(verify_token_handler))
}

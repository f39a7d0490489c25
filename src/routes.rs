//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{hash}`        - Short link redirect (public)
//! - `GET  /health`        - Health check: link store, cache (public)
//! - `/api/link/*`         - Link management (optional or required bearer token)
//! - `/api/token/verify`   - Token verification
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::rate_limit::{self, PeerIpKeyExtractor, SmartIpKeyExtractor};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let public = Router::new()
        .route("/{hash}", get(redirect_handler))
        .nest("/api/link", api::routes::link_routes());
    let token = api::routes::token_routes();

    let (public, token) = if behind_proxy {
        (
            public.layer(rate_limit::layer(SmartIpKeyExtractor)),
            token.layer(rate_limit::secure_layer(SmartIpKeyExtractor)),
        )
    } else {
        (
            public.layer(rate_limit::layer(PeerIpKeyExtractor)),
            token.layer(rate_limit::secure_layer(PeerIpKeyExtractor)),
        )
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(public)
        .nest("/api/token", token)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

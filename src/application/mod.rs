//! Application layer services implementing business logic.
//!
//! Services consume repository traits and take the caller identity as an
//! explicit argument, so HTTP handlers only translate requests and responses.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Link creation, lookup, listing, deletion
//! - [`services::redirect_resolver::RedirectResolver`] - Cached hash to destination lookups
//! - [`services::auth_service::AuthService`] - Bearer token verification

pub mod services;

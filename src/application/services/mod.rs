//! Business logic services for the application layer.

pub mod auth_service;
pub mod redirect_resolver;
pub mod shortener_service;

pub use auth_service::{AuthService, TokenError, VerifiedToken};
pub use redirect_resolver::RedirectResolver;
pub use shortener_service::ShortenerService;

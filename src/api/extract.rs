//! Bearer token extraction.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use axum_auth::AuthBearer;
use serde_json::json;
use std::convert::Infallible;
use tracing::debug;

use crate::application::services::TokenError;
use crate::domain::entities::{Caller, UserId};
use crate::error::AppError;
use crate::state::AppState;

/// Outcome of reading the `Authorization` header.
///
/// Extraction never fails by itself. Handlers turn it into a [`Caller`]
/// through [`Authentication::caller_strict`].
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    /// No `Authorization` header.
    Anonymous,
    Verified(UserId),
    /// A header was sent but did not carry a valid token.
    Rejected(TokenError),
}

impl Authentication {
    /// Fails with `401` when a token was presented but did not verify.
    ///
    /// A missing header still yields [`Caller::Anonymous`]; operations that
    /// need an identity reject it themselves.
    pub fn caller_strict(self) -> Result<Caller, AppError> {
        match self {
            Self::Verified(id) => Ok(Caller::User(id)),
            Self::Anonymous => Ok(Caller::Anonymous),
            Self::Rejected(e) => Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": e.to_string() }),
            )),
        }
    }
}

impl FromRequestParts<AppState> for Authentication {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(Self::Anonymous);
        }

        let Ok(AuthBearer(token)) = AuthBearer::from_request_parts(parts, &()).await else {
            debug!("Authorization header is not a bearer token");
            return Ok(Self::Rejected(TokenError::Malformed));
        };

        match state.auth_service.verify(Some(&token)) {
            Ok(Caller::User(id)) => Ok(Self::Verified(id)),
            Ok(Caller::Anonymous) => Ok(Self::Anonymous),
            Err(e) => {
                debug!(error = %e, "Bearer token rejected");
                Ok(Self::Rejected(e))
            }
        }
    }
}

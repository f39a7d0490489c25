//! Handler for token verification.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::token::{VerifyTokenRequest, VerifyTokenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Verifies a bearer token and reports whom it identifies.
///
/// # Endpoint
///
/// `POST /api/token/verify`
///
/// # Request Body
///
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiJ9..." }
/// ```
///
/// # Errors
///
/// Returns 401 for malformed, tampered or expired tokens.
pub async fn verify_token_handler(
    State(state): State<AppState>,
    Json(payload): Json<VerifyTokenRequest>,
) -> Result<Json<VerifyTokenResponse>, AppError> {
    payload.validate()?;

    let verified = state.auth_service.decode(&payload.token)?;

    Ok(Json(VerifyTokenResponse {
        subject: verified.subject.into_inner(),
        expires_at: verified.expires_at,
    }))
}

//! Source URL validation.
//!
//! Links are stored exactly as submitted, so validation only accepts input
//! that already is a well-formed absolute `http`/`https` URI. Nothing is
//! rewritten.

use url::Url;

/// Longest accepted source URL, in bytes.
pub const MAX_SOURCE_LINK_LENGTH: usize = 2048;

/// Reasons a source URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL is longer than {MAX_SOURCE_LINK_LENGTH} bytes")]
    TooLong,

    #[error("URL must not contain whitespace or control characters")]
    IllegalCharacters,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute `http(s)` URL with a host.
///
/// # Security
///
/// Rejects potentially dangerous schemes like `javascript:`, `data:`, `file:`.
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] that applies.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_source_link("https://example.com/a").is_ok());
/// assert!(validate_source_link("/relative/path").is_err());
/// assert!(validate_source_link("javascript:alert(1)").is_err());
/// ```
pub fn validate_source_link(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_SOURCE_LINK_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    // `Url::parse` silently trims and strips these, which would make the
    // stored value differ from what was validated.
    if input
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(UrlValidationError::IllegalCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

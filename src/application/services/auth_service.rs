//! Bearer token verification and issuance.
//!
//! Tokens are compact HS256 JWTs: `base64url(header).base64url(claims).base64url(mac)`
//! where `mac` is HMAC-SHA256 over the first two segments, keyed with the
//! server signing secret. Credentials and login flows live outside this
//! service; it only trusts what the secret has signed.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;

use crate::domain::entities::{Caller, UserId};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

/// Why a presented token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token algorithm is not supported")]
    UnsupportedAlgorithm,

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token has no subject")]
    MissingSubject,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    /// Subject claim name used by some issuers instead of `sub`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<Value>,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
}

impl Claims {
    fn subject(&self) -> Option<String> {
        if let Some(sub) = self.sub.as_deref().filter(|s| !s.is_empty()) {
            return Some(sub.to_string());
        }

        match &self.user_id {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A successfully verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Verifies bearer tokens and turns them into a [`Caller`].
pub struct AuthService {
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the secret of whoever issues the tokens.
    pub fn new(signing_secret: String) -> Self {
        Self { signing_secret }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length")
    }

    /// Resolves an optional bearer token into a caller.
    ///
    /// No token means [`Caller::Anonymous`]. A token that is present but fails
    /// verification is an error; whether that error is fatal is up to the
    /// caller of this method.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] for malformed, tampered, expired, or
    /// subject-less tokens.
    pub fn verify(&self, token: Option<&str>) -> Result<Caller, TokenError> {
        match token {
            None => Ok(Caller::Anonymous),
            Some(token) => self.decode(token).map(|t| Caller::User(t.subject)),
        }
    }

    /// Decodes and fully verifies a token against the current time.
    pub fn decode(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.decode_at(token, Utc::now())
    }

    fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header: Header = decode_segment(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = decode_segment(claims_b64)?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        let subject = claims.subject().ok_or(TokenError::MissingSubject)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(TokenError::Malformed)?;

        Ok(VerifiedToken {
            subject: UserId::new(subject),
            expires_at,
        })
    }

    /// Issues a token for `subject` valid for `ttl` from now.
    pub fn issue(&self, subject: &UserId, ttl: Duration) -> String {
        self.issue_at(subject, Utc::now(), ttl)
    }

    fn issue_at(&self, subject: &UserId, issued_at: DateTime<Utc>, ttl: Duration) -> String {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: Some("JWT".to_string()),
        };
        let claims = Claims {
            sub: Some(subject.as_str().to_string()),
            user_id: None,
            exp: (issued_at + ttl).timestamp(),
            iat: Some(issued_at.timestamp()),
        };

        let signing_input = format!("{}.{}", encode_segment(&header), encode_segment(&claims));

        let mut mac = self.mac();
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{signing_input}.{signature}")
    }
}

fn encode_segment<T: Serialize>(value: &T) -> String {
    // Header and Claims contain only strings and integers.
    let json = serde_json::to_vec(value).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

//! Bearer token handling.
//!
//! Decoding here is read-only introspection: the signature segment is never
//! checked, so the result must not be used for trust decisions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;
use thiserror::Error;

/// Errors from token introspection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token does not have header, payload and signature segments.
    #[error("token has {0} segments, expected 3")]
    Malformed(usize),

    /// The payload segment is not valid base64url.
    #[error("payload is not base64url: {0}")]
    Base64(String),

    /// The payload is not a JSON object.
    #[error("payload is not a JSON object: {0}")]
    Json(String),

    /// The payload has no usable `sub` claim.
    #[error("payload has no subject claim")]
    MissingSubject,
}

/// An issued bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Subject identifier carried by the token.
    pub fn subject(&self) -> Result<String, TokenError> {
        subject_of(&self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken(<{} bytes>)", self.0.len())
    }
}

/// Recover the `sub` claim from a JWT-shaped token without verifying it.
///
/// String subjects are returned as-is; integer subjects are rendered in
/// decimal.
pub fn subject_of(token: &str) -> Result<String, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed(segments.len()));
    }

    let payload = decode_segment(segments[1])?;
    let claims: Value =
        serde_json::from_slice(&payload).map_err(|e| TokenError::Json(e.to_string()))?;
    let claims = claims
        .as_object()
        .ok_or_else(|| TokenError::Json("not an object".to_string()))?;

    match claims.get("sub") {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
        _ => Err(TokenError::MissingSubject),
    }
}

/// Decode a base64url segment, tolerating present or absent `=` padding.
fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| TokenError::Base64(e.to_string()))
}

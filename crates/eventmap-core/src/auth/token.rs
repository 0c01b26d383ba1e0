//! Bearer token inspection.
//!
//! Tokens are three `.`-separated base64url segments (header, payload,
//! signature). Only the payload is decoded; the signature is never checked,
//! so nothing here proves a token is authentic.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Malformed token: expected 3 segments, found {0}")]
    Malformed(usize),

    #[error("Invalid payload encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Invalid claims: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Standard claims carried in the token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration, seconds since epoch. May be fractional.
    #[serde(default)]
    pub exp: Option<f64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
}

/// Decode the claims of `token` without verifying its signature
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed(segments.len()));
    }

    let payload = segments[1];
    let bytes = if payload.ends_with('=') {
        URL_SAFE.decode(payload)?
    } else {
        URL_SAFE_NO_PAD.decode(payload)?
    };
    Ok(serde_json::from_slice(&bytes)?)
}

/// Expiration instant of `token`, if it decodes and carries `exp`
pub fn token_expires_at(token: &str) -> Option<DateTime<Utc>> {
    let exp = decode_claims(token).ok()?.exp?;
    DateTime::from_timestamp_millis((exp * 1000.0).floor() as i64)
}

/// Check whether `token` is expired relative to the current time
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now())
}

/// Check whether `token` is expired at `now`.
///
/// A token is usable only while `exp` is strictly in the future. Tokens that
/// fail to decode or carry no `exp` count as expired.
pub fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        Ok(TokenClaims { exp: Some(exp), .. }) => exp * 1000.0 <= now.timestamp_millis() as f64,
        Ok(_) => {
            debug!("Token has no exp claim, treating as expired");
            true
        }
        Err(e) => {
            debug!(error = %e, "Token could not be decoded, treating as expired");
            true
        }
    }
}

//! Best-effort inspection of bearer tokens.
//!
//! The server issues JWTs, but the client treats tokens as opaque. This module
//! only peeks at the payload for display (`tareas whoami`); nothing here
//! verifies a signature or gates a request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims readable from a JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenClaims {
    /// Whether the token is past its expiry. Tokens without `exp` never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

#[derive(Deserialize)]
struct RawClaims {
    sub: Option<String>,
    iat: Option<i64>,
    exp: Option<i64>,
}

/// Decode the payload of a JWT. Returns `None` for anything that is not one.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let raw: RawClaims = serde_json::from_slice(&bytes).ok()?;
    Some(TokenClaims {
        subject: raw.sub,
        issued_at: raw.iat.and_then(|s| DateTime::from_timestamp(s, 0)),
        expires_at: raw.exp.and_then(|s| DateTime::from_timestamp(s, 0)),
    })
}

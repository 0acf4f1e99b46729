// ABOUTME: HS256 bearer-token signing and verification
// ABOUTME: Constant-time signature checks; expiry honored on verify

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::gate::Role;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    Expired,
}

/// Token payload carried on every authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub exp: u64,
    pub iat: u64,
}

impl Claims {
    /// Build claims valid for `ttl_secs` from now.
    pub fn new(id: &str, username: &str, email: &str, role: Role, ttl_secs: u64) -> Self {
        let now = unix_now();
        Self {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role,
            exp: now + ttl_secs,
            iat: now,
        }
    }
}

/// Sign claims into a compact HS256 token.
pub fn sign(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = serde_json::to_vec(claims).map_err(|_| AuthError::InvalidToken)?;
    let payload = URL_SAFE_NO_PAD.encode(payload);
    let signature = signature(&header, &payload, secret);
    Ok(format!("{}.{}.{}", header, payload, signature))
}

/// Verify a token's structure, signature and expiry, returning its claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::InvalidToken);
    }

    verify_signature(parts[0], parts[1], parts[2], secret)?;

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|_| AuthError::InvalidToken)?;
    let claims: Claims = serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;

    if claims.exp < unix_now() {
        return Err(AuthError::Expired);
    }

    Ok(claims)
}

fn signature(header: &str, payload: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Constant-time signature comparison (prevents timing attacks).
fn verify_signature(
    header: &str,
    payload: &str,
    signature: &str,
    secret: &str,
) -> Result<(), AuthError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());

    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::InvalidToken)?;

    mac.verify_slice(&signature_bytes)
        .map_err(|_| AuthError::InvalidToken)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

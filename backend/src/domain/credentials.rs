//! Password hashing and bearer tokens.
//!
//! Passwords are stored as bcrypt hashes (`$2b$<cost>$<salt+hash>`).
//! Tokens are `base64url(claims).base64url(hmac_sha256(claims segment))`
//! where the claims are the JSON object `{"sub": <user id>, "exp": <unix seconds>}`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq)]
pub enum CredentialError {
    #[error("Malformed token")]
    Malformed,
    #[error("Invalid token signature")]
    BadSignature,
    #[error("Token expired")]
    Expired,
    #[error("Signing key rejected")]
    Key,
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[cfg(not(test))]
const PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;
// lowest cost bcrypt accepts, keeps the test suite fast
#[cfg(test)]
const PASSWORD_COST: u32 = 4;

/// Salted bcrypt hash of `password`. CPU heavy, call it off the async workers.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    bcrypt::hash(password, PASSWORD_COST).map_err(|e| CredentialError::Hashing(e.to_string()))
}

/// Check `password` against a stored bcrypt hash. A malformed hash never matches.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Issues and verifies bearer tokens with a shared secret
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::days(ttl_days),
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, CredentialError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, CredentialError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.ttl).timestamp(),
        };
        let payload = serde_json::to_vec(&claims).map_err(|_| CredentialError::Malformed)?;
        let claims_segment = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = self.mac()?;
        mac.update(claims_segment.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", claims_segment, signature))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, CredentialError> {
        let (claims_segment, signature) = token
            .trim()
            .split_once('.')
            .ok_or(CredentialError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| CredentialError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(claims_segment.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| CredentialError::BadSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(claims_segment)
            .map_err(|_| CredentialError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| CredentialError::Malformed)?;

        if claims.exp <= now.timestamp() {
            return Err(CredentialError::Expired);
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, CredentialError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|_| CredentialError::Key)
    }
}

//! Opaque refresh token issuance, validation, and revocation.
//!
//! Raw tokens are 64 random bytes, hex-encoded, handed to the caller once
//! and never persisted; the store keeps only their SHA-256 hash. Each user
//! has at most one live token: issuing atomically replaces any existing
//! row for that user.

use super::errors::{AuthError, AuthResult};
use super::models::UserId;
use crate::db::repository::RefreshTokenRepository;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Default refresh token lifetime
const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Raw token length in bytes before hex encoding
const RAW_TOKEN_BYTES: usize = 64;

/// A freshly issued refresh token; `raw_token` exists only in this value.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub raw_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Refresh token store enforcing one live session per user.
#[derive(Clone)]
pub struct RefreshTokenStore {
    repository: Arc<dyn RefreshTokenRepository>,
    ttl: Duration,
}

impl RefreshTokenStore {
    /// Create a store with the default 7-day token lifetime.
    pub fn new(repository: Arc<dyn RefreshTokenRepository>) -> Self {
        Self::with_ttl(repository, Duration::days(DEFAULT_REFRESH_TOKEN_TTL_DAYS))
    }

    /// Create a store with an explicit token lifetime.
    pub fn with_ttl(repository: Arc<dyn RefreshTokenRepository>, ttl: Duration) -> Self {
        Self { repository, ttl }
    }

    /// Issue a new refresh token for a user, replacing any existing one.
    ///
    /// The replacement is one atomic write keyed on the user, so two
    /// concurrent logins both succeed and can never leave two live rows;
    /// the last writer wins and earlier raw tokens silently stop validating.
    pub async fn issue(&self, user_id: UserId) -> AuthResult<IssuedRefreshToken> {
        let mut bytes = [0u8; RAW_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let raw_token = hex::encode(bytes);

        let expires_at = Utc::now() + self.ttl;
        self.repository
            .replace_for_user(user_id, &hash_token(&raw_token), expires_at)
            .await?;

        Ok(IssuedRefreshToken {
            raw_token,
            expires_at,
        })
    }

    /// Validate a raw refresh token and resolve its owner.
    ///
    /// Unknown, revoked, and expired tokens are indistinguishable to the
    /// caller: all fail with [`AuthError::InvalidRefreshToken`].
    pub async fn validate(&self, raw_token: &str) -> AuthResult<UserId> {
        let record = self
            .repository
            .find_by_hash(&hash_token(raw_token))
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if !record.is_live(Utc::now()) {
            return Err(AuthError::InvalidRefreshToken);
        }

        Ok(record.user_id)
    }

    /// Mark the matching token revoked.
    ///
    /// Idempotent: revoking an already-revoked, expired, or unknown token
    /// succeeds without complaint.
    pub async fn revoke(&self, raw_token: &str) -> AuthResult<()> {
        self.repository
            .revoke_by_hash(&hash_token(raw_token))
            .await
    }
}

/// One-way hash applied to raw tokens before any persistence or lookup.
fn hash_token(raw_token: &str) -> String {
    hex::encode(Sha256::digest(raw_token.as_bytes()))
}

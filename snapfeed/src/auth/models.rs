//! Authentication data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User ID type
pub type UserId = i64;

/// User model
///
/// The password hash never leaves the server: it is skipped on
/// serialization, and handler responses are built from [`UserSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub nickname: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, safe to return to any caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub nickname: String,
    pub profile_image_url: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            profile_image_url: user.profile_image_url.clone(),
        }
    }
}

/// Signup request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub profile_image_url: Option<String>,
}

/// Signup response: an access token only, no refresh token until login
#[derive(Debug, Clone, Serialize)]
pub struct SignupResponse {
    pub access_token: String,
    pub user: UserSummary,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: both tokens plus the public user view
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID
    pub sub: UserId,
    pub email: String,
    /// Issued-at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Persisted refresh token row
///
/// Only the SHA-256 hash of the raw token is stored. `user_id` is unique:
/// issuing a new token for a user replaces any prior row.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub user_id: UserId,
    pub hashed_token: String,
    pub is_revoked: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// A token is live if it has not been revoked and has not expired.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && self.expires_at > now
    }
}

/// Fields for creating a user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub profile_image_url: Option<String>,
}

/// Partial update of a user row; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub nickname: Option<String>,
    pub profile_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            email: "ada@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            nickname: "ada".to_string(),
            profile_image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn refresh_record_liveness() {
        let now = Utc::now();
        let record = RefreshTokenRecord {
            id: 1,
            user_id: 1,
            hashed_token: "abc".to_string(),
            is_revoked: false,
            expires_at: now + chrono::Duration::days(7),
            created_at: now,
        };

        assert!(record.is_live(now));
        assert!(!record.is_live(now + chrono::Duration::days(8)));

        let revoked = RefreshTokenRecord {
            is_revoked: true,
            ..record
        };
        assert!(!revoked.is_live(now));
    }
}

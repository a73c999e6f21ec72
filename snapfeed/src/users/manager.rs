//! User manager implementation.

use crate::auth::errors::{AuthError, AuthResult};
use crate::auth::models::{User, UserChanges, UserId};
use crate::auth::password;
use crate::db::repository::UserRepository;
use std::sync::Arc;

/// Requested profile changes; `None` fields are left untouched.
///
/// A new password arrives in plaintext and is hashed before it reaches the
/// store.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub profile_image_url: Option<String>,
}

/// User manager
#[derive(Clone)]
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create a new user manager
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Fetch a user's own profile
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - No account with this id
    pub async fn profile(&self, user_id: UserId) -> AuthResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Apply a partial profile update
    ///
    /// Changed email and nickname values are re-checked for uniqueness
    /// before the update is applied; a new password is re-hashed.
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - No account with this id
    /// * `AuthError::DuplicateEmail` - New email belongs to another account
    /// * `AuthError::DuplicateNickname` - New nickname belongs to another account
    pub async fn update(&self, user_id: UserId, update: ProfileUpdate) -> AuthResult<User> {
        if let Some(email) = &update.email {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id != user_id {
                    return Err(AuthError::DuplicateEmail);
                }
            }
        }

        if let Some(nickname) = &update.nickname {
            if let Some(existing) = self.users.find_by_nickname(nickname).await? {
                if existing.id != user_id {
                    return Err(AuthError::DuplicateNickname);
                }
            }
        }

        let password_hash = match &update.password {
            Some(plaintext) => Some(password::hash(plaintext)?),
            None => None,
        };

        let changes = UserChanges {
            email: update.email,
            password_hash,
            nickname: update.nickname,
            profile_image_url: update.profile_image_url,
        };

        let user = self.users.update_user(user_id, &changes).await?;
        tracing::info!(user_id, "profile updated");
        Ok(user)
    }

    /// Delete an account; refresh token and posts cascade at the store
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - No account with this id
    pub async fn remove(&self, user_id: UserId) -> AuthResult<()> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.users.delete_user(user_id).await?;
        tracing::info!(user_id, "account deleted");
        Ok(())
    }
}

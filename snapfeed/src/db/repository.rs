//! Repository trait definitions for testability and dependency injection.
//!
//! This module provides trait-based abstractions over database operations,
//! enabling better testing through mock implementations and dependency
//! injection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::auth::errors::{AuthError, AuthResult};
use crate::auth::models::{NewUser, RefreshTokenRecord, User, UserChanges, UserId};
use crate::posts::{NewPost, Post, PostResult};

/// Trait for user directory operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create_user(&self, new_user: &NewUser) -> AuthResult<User>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Find user by nickname
    async fn find_by_nickname(&self, nickname: &str) -> AuthResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Apply a partial update and return the updated row
    async fn update_user(&self, user_id: UserId, changes: &UserChanges) -> AuthResult<User>;

    /// Delete a user; owned refresh tokens and posts cascade
    async fn delete_user(&self, user_id: UserId) -> AuthResult<()>;
}

/// Trait for refresh token persistence
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Atomically replace any existing token row for a user with a new one.
    ///
    /// Must be a single atomic write keyed on `user_id` so concurrent
    /// issuers serialize on the row and the last writer wins; neither
    /// caller may observe an error from the collision.
    async fn replace_for_user(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// Find a token row by its stored hash
    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshTokenRecord>>;

    /// Mark the row with the given hash revoked; no-op if absent
    async fn revoke_by_hash(&self, token_hash: &str) -> AuthResult<()>;
}

/// Trait for post persistence
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post owned by the given user
    async fn insert_post(&self, user_id: UserId, new_post: &NewPost) -> PostResult<Post>;

    /// List a user's posts, newest first
    async fn list_by_user(&self, user_id: UserId) -> PostResult<Vec<Post>>;

    /// Delete a post if it exists and belongs to the user; returns whether
    /// a row was removed
    async fn delete_owned(&self, user_id: UserId, post_id: i64) -> PostResult<bool>;
}

const USER_COLUMNS: &str =
    "id, email, password_hash, nickname, profile_image_url, created_at, updated_at";

fn row_to_user(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        nickname: row.get("nickname"),
        profile_image_url: row.get("profile_image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Map a unique-constraint violation to the matching duplicate error;
/// anything else passes through as a database error.
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.constraint() {
            Some("users_email_key") => return AuthError::DuplicateEmail,
            Some("users_nickname_key") => return AuthError::DuplicateNickname,
            _ => {}
        }
    }
    AuthError::Database(err)
}

/// Default PostgreSQL implementation of [`UserRepository`]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, new_user: &NewUser) -> AuthResult<User> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (email, password_hash, nickname, profile_image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.nickname)
        .bind(&new_user.profile_image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(row_to_user(&row))
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_by_nickname(&self, nickname: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE nickname = $1"
        ))
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn update_user(&self, user_id: UserId, changes: &UserChanges) -> AuthResult<User> {
        let row = sqlx::query(&format!(
            "UPDATE users SET
                 email = COALESCE($2, email),
                 password_hash = COALESCE($3, password_hash),
                 nickname = COALESCE($4, nickname),
                 profile_image_url = COALESCE($5, profile_image_url),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&changes.nickname)
        .bind(&changes.profile_image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.as_ref().map(row_to_user).ok_or(AuthError::UserNotFound)
    }

    async fn delete_user(&self, user_id: UserId) -> AuthResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Default PostgreSQL implementation of [`RefreshTokenRepository`]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn replace_for_user(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        // Upsert keyed on the user_id unique constraint. Under READ
        // COMMITTED two concurrent issuers serialize on the row and both
        // succeed with the last writer winning; a delete-then-insert would
        // instead let both inserts race and fail one of them.
        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, hashed_token, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE
                 SET hashed_token = EXCLUDED.hashed_token,
                     is_revoked = FALSE,
                     expires_at = EXCLUDED.expires_at,
                     created_at = now()",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshTokenRecord>> {
        let row = sqlx::query(
            "SELECT id, user_id, hashed_token, is_revoked, expires_at, created_at
             FROM refresh_tokens
             WHERE hashed_token = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| RefreshTokenRecord {
            id: r.get("id"),
            user_id: r.get("user_id"),
            hashed_token: r.get("hashed_token"),
            is_revoked: r.get("is_revoked"),
            expires_at: r.get("expires_at"),
            created_at: r.get("created_at"),
        }))
    }

    async fn revoke_by_hash(&self, token_hash: &str) -> AuthResult<()> {
        sqlx::query("UPDATE refresh_tokens SET is_revoked = TRUE WHERE hashed_token = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Default PostgreSQL implementation of [`PostRepository`]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_post(row: &sqlx::postgres::PgRow) -> Post {
    Post {
        id: row.get("id"),
        user_id: row.get("user_id"),
        image_url: row.get("image_url"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn insert_post(&self, user_id: UserId, new_post: &NewPost) -> PostResult<Post> {
        let row = sqlx::query(
            "INSERT INTO posts (user_id, image_url, content)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, image_url, content, created_at",
        )
        .bind(user_id)
        .bind(&new_post.image_url)
        .bind(&new_post.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_post(&row))
    }

    async fn list_by_user(&self, user_id: UserId) -> PostResult<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT id, user_id, image_url, content, created_at
             FROM posts
             WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn delete_owned(&self, user_id: UserId, post_id: i64) -> PostResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Mock implementations for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub struct MockUserRepository {
        users: Mutex<HashMap<UserId, User>>,
        next_id: Mutex<UserId>,
    }

    impl Default for MockUserRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockUserRepository {
        pub fn new() -> Self {
            Self {
                users: Mutex::new(HashMap::new()),
                next_id: Mutex::new(1),
            }
        }

        pub fn with_user(self, user: User) -> Self {
            self.users.lock().unwrap().insert(user.id, user);
            self
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn create_user(&self, new_user: &NewUser) -> AuthResult<User> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == new_user.email) {
                return Err(AuthError::DuplicateEmail);
            }
            if users.values().any(|u| u.nickname == new_user.nickname) {
                return Err(AuthError::DuplicateNickname);
            }

            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;

            let now = Utc::now();
            let user = User {
                id,
                email: new_user.email.clone(),
                password_hash: new_user.password_hash.clone(),
                nickname: new_user.nickname.clone(),
                profile_image_url: new_user.profile_image_url.clone(),
                created_at: now,
                updated_at: now,
            };

            users.insert(id, user.clone());
            Ok(user)
        }

        async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_by_nickname(&self, nickname: &str) -> AuthResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.nickname == nickname).cloned())
        }

        async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
            Ok(self.users.lock().unwrap().get(&user_id).cloned())
        }

        async fn update_user(&self, user_id: UserId, changes: &UserChanges) -> AuthResult<User> {
            let mut users = self.users.lock().unwrap();
            let user = users.get_mut(&user_id).ok_or(AuthError::UserNotFound)?;

            if let Some(email) = &changes.email {
                user.email = email.clone();
            }
            if let Some(password_hash) = &changes.password_hash {
                user.password_hash = password_hash.clone();
            }
            if let Some(nickname) = &changes.nickname {
                user.nickname = nickname.clone();
            }
            if let Some(profile_image_url) = &changes.profile_image_url {
                user.profile_image_url = Some(profile_image_url.clone());
            }
            user.updated_at = Utc::now();

            Ok(user.clone())
        }

        async fn delete_user(&self, user_id: UserId) -> AuthResult<()> {
            self.users.lock().unwrap().remove(&user_id);
            Ok(())
        }
    }

    pub struct MockRefreshTokenRepository {
        tokens: Mutex<HashMap<UserId, RefreshTokenRecord>>,
        next_id: Mutex<i64>,
    }

    impl Default for MockRefreshTokenRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockRefreshTokenRepository {
        pub fn new() -> Self {
            Self {
                tokens: Mutex::new(HashMap::new()),
                next_id: Mutex::new(1),
            }
        }
    }

    #[async_trait]
    impl RefreshTokenRepository for MockRefreshTokenRepository {
        async fn replace_for_user(
            &self,
            user_id: UserId,
            token_hash: &str,
            expires_at: DateTime<Utc>,
        ) -> AuthResult<()> {
            // Keyed by user_id: insertion replaces under one lock, matching
            // the on-conflict upsert of the Pg implementation.
            let mut tokens = self.tokens.lock().unwrap();
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;

            tokens.insert(
                user_id,
                RefreshTokenRecord {
                    id,
                    user_id,
                    hashed_token: token_hash.to_string(),
                    is_revoked: false,
                    expires_at,
                    created_at: Utc::now(),
                },
            );
            Ok(())
        }

        async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<RefreshTokenRecord>> {
            let tokens = self.tokens.lock().unwrap();
            Ok(tokens
                .values()
                .find(|t| t.hashed_token == token_hash)
                .cloned())
        }

        async fn revoke_by_hash(&self, token_hash: &str) -> AuthResult<()> {
            let mut tokens = self.tokens.lock().unwrap();
            if let Some(record) = tokens.values_mut().find(|t| t.hashed_token == token_hash) {
                record.is_revoked = true;
            }
            Ok(())
        }
    }

    pub struct MockPostRepository {
        posts: Mutex<Vec<Post>>,
        next_id: Mutex<i64>,
    }

    impl Default for MockPostRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockPostRepository {
        pub fn new() -> Self {
            Self {
                posts: Mutex::new(Vec::new()),
                next_id: Mutex::new(1),
            }
        }
    }

    #[async_trait]
    impl PostRepository for MockPostRepository {
        async fn insert_post(&self, user_id: UserId, new_post: &NewPost) -> PostResult<Post> {
            let mut posts = self.posts.lock().unwrap();
            let mut next_id = self.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;

            let post = Post {
                id,
                user_id,
                image_url: new_post.image_url.clone(),
                content: new_post.content.clone(),
                created_at: Utc::now(),
            };
            posts.push(post.clone());
            Ok(post)
        }

        async fn list_by_user(&self, user_id: UserId) -> PostResult<Vec<Post>> {
            let posts = self.posts.lock().unwrap();
            let mut owned: Vec<Post> = posts
                .iter()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect();
            owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(owned)
        }

        async fn delete_owned(&self, user_id: UserId, post_id: i64) -> PostResult<bool> {
            let mut posts = self.posts.lock().unwrap();
            let before = posts.len();
            posts.retain(|p| !(p.id == post_id && p.user_id == user_id));
            Ok(posts.len() < before)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn new_user(email: &str, nickname: &str) -> NewUser {
            NewUser {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                nickname: nickname.to_string(),
                profile_image_url: None,
            }
        }

        #[tokio::test]
        async fn mock_user_ids_increment() {
            let repo = MockUserRepository::new();

            let first = repo.create_user(&new_user("a@example.com", "a")).await.unwrap();
            let second = repo.create_user(&new_user("b@example.com", "b")).await.unwrap();

            assert_eq!(first.id, 1);
            assert_eq!(second.id, 2);
        }

        #[tokio::test]
        async fn mock_user_uniqueness() {
            let repo = MockUserRepository::new();
            repo.create_user(&new_user("a@example.com", "a")).await.unwrap();

            let err = repo
                .create_user(&new_user("a@example.com", "other"))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::DuplicateEmail));

            let err = repo
                .create_user(&new_user("other@example.com", "a"))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::DuplicateNickname));
        }

        #[tokio::test]
        async fn mock_user_lookup_and_delete() {
            let repo = MockUserRepository::new();
            let user = repo.create_user(&new_user("a@example.com", "a")).await.unwrap();

            assert!(repo.find_by_email("a@example.com").await.unwrap().is_some());
            assert!(repo.find_by_nickname("a").await.unwrap().is_some());
            assert!(repo.find_by_id(user.id).await.unwrap().is_some());

            repo.delete_user(user.id).await.unwrap();
            assert!(repo.find_by_id(user.id).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn mock_replace_keeps_one_row_per_user() {
            let repo = MockRefreshTokenRepository::new();
            let expires = Utc::now() + chrono::Duration::days(7);

            repo.replace_for_user(1, "hash_one", expires).await.unwrap();
            repo.replace_for_user(1, "hash_two", expires).await.unwrap();

            assert!(repo.find_by_hash("hash_one").await.unwrap().is_none());
            assert!(repo.find_by_hash("hash_two").await.unwrap().is_some());
        }

        #[tokio::test]
        async fn mock_post_ownership_scoping() {
            let repo = MockPostRepository::new();
            let new_post = NewPost {
                image_url: "https://img.example.com/1.jpg".to_string(),
                content: None,
            };

            let post = repo.insert_post(1, &new_post).await.unwrap();

            // Another user cannot delete it.
            assert!(!repo.delete_owned(2, post.id).await.unwrap());
            assert!(repo.delete_owned(1, post.id).await.unwrap());
        }
    }
}

//! # Snapfeed
//!
//! Backend library for a social feed application: user accounts, JWT-based
//! session authentication with a single refresh session per user, and
//! ownership-scoped posts.
//!
//! ## Core Modules
//!
//! - [`auth`]: Password hashing, access/refresh token lifecycle, and the
//!   session manager orchestrating signup, login, refresh, and logout
//! - [`users`]: Profile lookup, updates, and account removal
//! - [`posts`]: Post creation, listing, and deletion scoped to the owner
//! - [`db`]: PostgreSQL connection pooling and repository traits
//!
//! ## Example
//!
//! ```no_run
//! use snapfeed::auth::{AuthManager, SignupRequest, TokenSigner};
//! use snapfeed::db::{Database, DatabaseConfig, PgRefreshTokenRepository, PgUserRepository};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::default()).await?;
//!     let users = Arc::new(PgUserRepository::new(db.pool().clone()));
//!     let tokens = Arc::new(PgRefreshTokenRepository::new(db.pool().clone()));
//!     let signer = TokenSigner::new("jwt_secret");
//!     let auth = AuthManager::new(users, tokens, signer);
//!
//!     let signup = auth
//!         .signup(SignupRequest {
//!             email: "ada@example.com".to_string(),
//!             password: "Hunter2!long".to_string(),
//!             nickname: "ada".to_string(),
//!             profile_image_url: None,
//!         })
//!         .await?;
//!     println!("Registered {}", signup.user.nickname);
//!     Ok(())
//! }
//! ```

/// Authentication: credentials, tokens, and session lifecycle.
pub mod auth;
pub use auth::{AuthError, AuthManager, AuthResult, TokenSigner, User, UserId};

/// Database pooling, configuration, and repository traits.
pub mod db;
pub use db::{Database, DatabaseConfig};

/// Post creation, listing, and deletion.
pub mod posts;
pub use posts::{Post, PostError, PostManager, PostResult};

/// User profile management.
pub mod users;
pub use users::UserManager;

//! Authentication module providing user registration, login, and session management.
//!
//! This module implements:
//! - bcrypt password hashing (cost factor 10)
//! - JWT access tokens (15-minute expiry, HS256)
//! - Opaque refresh tokens (7-day expiry), stored only as SHA-256 hashes,
//!   with at most one live token per user
//!
//! ## Example
//!
//! ```no_run
//! use snapfeed::auth::{AuthManager, LoginRequest, TokenSigner};
//! use snapfeed::db::{Database, DatabaseConfig, PgRefreshTokenRepository, PgUserRepository};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::default()).await?;
//!     let auth = AuthManager::new(
//!         Arc::new(PgUserRepository::new(db.pool().clone())),
//!         Arc::new(PgRefreshTokenRepository::new(db.pool().clone())),
//!         TokenSigner::new("jwt_secret"),
//!     );
//!
//!     let session = auth
//!         .login(LoginRequest {
//!             email: "ada@example.com".to_string(),
//!             password: "Hunter2!long".to_string(),
//!         })
//!         .await?;
//!     println!("Logged in as {}", session.user.nickname);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod password;
pub mod refresh;
pub mod tokens;

pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{
    AccessTokenClaims, LoginRequest, LoginResponse, RefreshTokenRecord, SignupRequest,
    SignupResponse, User, UserId, UserSummary,
};
pub use refresh::{IssuedRefreshToken, RefreshTokenStore};
pub use tokens::TokenSigner;

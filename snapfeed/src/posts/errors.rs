//! Post error types.

use thiserror::Error;

/// Post errors
#[derive(Debug, Error)]
pub enum PostError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Post missing or owned by someone else
    #[error("Post not found")]
    PostNotFound,
}

impl PostError {
    /// Get a client-safe error message that doesn't leak sensitive information
    pub fn client_message(&self) -> String {
        match self {
            PostError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for post operations
pub type PostResult<T> = Result<T, PostError>;

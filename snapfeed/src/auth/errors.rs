//! Authentication error types.

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing or verification failed internally
    #[error("Password hashing failed")]
    HashingFailed,

    /// Unknown email or wrong password; the two cases are deliberately
    /// indistinguishable to the caller
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Email already registered
    #[error("Email already exists")]
    DuplicateEmail,

    /// Nickname already registered
    #[error("Nickname already exists")]
    DuplicateNickname,

    /// No bearer token on a protected request
    #[error("No authentication token provided")]
    MissingToken,

    /// Access token failed verification (expired, malformed, or bad signature)
    #[error("Invalid authentication token")]
    InvalidToken,

    /// Refresh token unknown, revoked, or expired
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// JWT signing error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database and JWT errors are sanitized to prevent information disclosure
    /// about the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Database(_) => "Internal server error".to_string(),
            AuthError::Jwt(_) => "Authentication failed".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_are_sanitized() {
        let err = AuthError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn credential_errors_do_not_name_a_cause() {
        let msg = AuthError::InvalidCredentials.client_message();
        assert!(!msg.to_lowercase().contains("email missing"));
        assert!(!msg.to_lowercase().contains("wrong"));
    }
}

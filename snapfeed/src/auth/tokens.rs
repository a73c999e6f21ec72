//! JWT access token signing and verification.

use super::errors::{AuthError, AuthResult};
use super::models::{AccessTokenClaims, UserId};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

/// Default access token lifetime
const DEFAULT_ACCESS_TOKEN_TTL_MINS: i64 = 15;

/// Signs and verifies short-lived HS256 access tokens.
///
/// Stateless: verification checks only the signature and expiry, so a token
/// stays valid until its `exp` instant regardless of server-side state.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer with the default 15-minute token lifetime.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINS))
    }

    /// Create a signer with an explicit token lifetime.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        // Zero leeway: a token is rejected one tick past its expiry instant.
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Sign an access token carrying the user's identity claims.
    pub fn sign(&self, user_id: UserId, email: &str) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify an access token and return its claims.
    ///
    /// Expired, malformed, and badly-signed tokens all map to
    /// [`AuthError::InvalidToken`]; the caller cannot tell the cases apart.
    pub fn verify(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_returns_claims() {
        let signer = TokenSigner::new("test_secret_key_for_testing_only");
        let token = signer.sign(42, "ada@example.com").unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_invalid() {
        let signer =
            TokenSigner::with_ttl("test_secret_key_for_testing_only", Duration::seconds(-1));
        let token = signer.sign(42, "ada@example.com").unwrap();

        let err = signer.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let signer = TokenSigner::new("test_secret_key_for_testing_only");
        let token = signer.sign(42, "ada@example.com").unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(matches!(
            signer.verify(&tampered).unwrap_err(),
            AuthError::InvalidToken
        ));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let signer = TokenSigner::new("test_secret_key_for_testing_only");
        let other = TokenSigner::new("a_completely_different_secret_key");
        let token = signer.sign(42, "ada@example.com").unwrap();

        assert!(matches!(
            other.verify(&token).unwrap_err(),
            AuthError::InvalidToken
        ));
    }

    #[test]
    fn malformed_token_is_invalid() {
        let signer = TokenSigner::new("test_secret_key_for_testing_only");
        assert!(matches!(
            signer.verify("not.a.jwt").unwrap_err(),
            AuthError::InvalidToken
        ));
    }
}

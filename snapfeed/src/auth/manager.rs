//! Session manager implementation.
//!
//! Orchestrates signup, login, token refresh, and logout over the user
//! directory, the credential hasher, the token signer, and the refresh
//! token store.

use super::errors::{AuthError, AuthResult};
use super::models::{
    AccessTokenClaims, LoginRequest, LoginResponse, NewUser, SignupRequest, SignupResponse,
    UserSummary,
};
use super::password;
use super::refresh::RefreshTokenStore;
use super::tokens::TokenSigner;
use crate::db::repository::{RefreshTokenRepository, UserRepository};
use std::sync::Arc;

/// Session manager
#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserRepository>,
    refresh_tokens: RefreshTokenStore,
    signer: TokenSigner,
}

impl AuthManager {
    /// Create a session manager with default token lifetimes.
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_repository: Arc<dyn RefreshTokenRepository>,
        signer: TokenSigner,
    ) -> Self {
        Self::with_refresh_store(users, RefreshTokenStore::new(refresh_repository), signer)
    }

    /// Create a session manager over an explicitly configured refresh store.
    pub fn with_refresh_store(
        users: Arc<dyn UserRepository>,
        refresh_tokens: RefreshTokenStore,
        signer: TokenSigner,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            signer,
        }
    }

    /// Register a new account and issue an access token.
    ///
    /// No refresh token is issued at signup; a session starts at login.
    ///
    /// # Errors
    ///
    /// * `AuthError::DuplicateEmail` - Email already registered
    /// * `AuthError::DuplicateNickname` - Nickname already registered
    pub async fn signup(&self, request: SignupRequest) -> AuthResult<SignupResponse> {
        // Both uniqueness checks run concurrently; the store's unique
        // constraints remain the backstop for races.
        let (by_email, by_nickname) = tokio::join!(
            self.users.find_by_email(&request.email),
            self.users.find_by_nickname(&request.nickname)
        );

        if by_email?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }
        if by_nickname?.is_some() {
            return Err(AuthError::DuplicateNickname);
        }

        let password_hash = password::hash(&request.password)?;
        let user = self
            .users
            .create_user(&NewUser {
                email: request.email,
                password_hash,
                nickname: request.nickname,
                profile_image_url: request.profile_image_url,
            })
            .await?;

        let access_token = self.signer.sign(user.id, &user.email)?;
        tracing::info!(user_id = user.id, "user registered");

        Ok(SignupResponse {
            access_token,
            user: UserSummary::from(&user),
        })
    }

    /// Authenticate by email and password; issue both tokens.
    ///
    /// Issuing the refresh token atomically replaces any prior session for
    /// this user; under concurrent logins the last writer wins.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredentials` - Unknown email or wrong password,
    ///   indistinguishably
    pub async fn login(&self, request: LoginRequest) -> AuthResult<LoginResponse> {
        let user = match self.users.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("login rejected: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !password::verify(&request.password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.signer.sign(user.id, &user.email)?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;
        tracing::info!(user_id = user.id, "user logged in");

        Ok(LoginResponse {
            access_token,
            refresh_token: refresh_token.raw_token,
            user: UserSummary::from(&user),
        })
    }

    /// Exchange a raw refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated here; it is only replaced on
    /// the next login.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidRefreshToken` - Token unknown, revoked, expired,
    ///   or its account no longer exists
    pub async fn refresh(&self, raw_refresh_token: &str) -> AuthResult<String> {
        let user_id = self.refresh_tokens.validate(raw_refresh_token).await?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let access_token = self.signer.sign(user.id, &user.email)?;
        tracing::debug!(user_id, "access token refreshed");
        Ok(access_token)
    }

    /// Revoke a session's refresh token.
    ///
    /// Never fails from the caller's perspective: unknown, expired, and
    /// already-revoked tokens are all fine, and store failures are logged
    /// rather than surfaced.
    pub async fn logout(&self, raw_refresh_token: &str) {
        if let Err(err) = self.refresh_tokens.revoke(raw_refresh_token).await {
            tracing::warn!(error = %err, "logout revocation failed");
        }
    }

    /// Verify an access token and return its claims.
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        self.signer.verify(token)
    }
}

//! Authentication API handlers.
//!
//! HTTP endpoints for the session lifecycle:
//! - Signup with email, password, nickname, and optional profile image
//! - Login with email/password
//! - Access token refresh
//! - Logout to revoke the refresh token
//!
//! All endpoints return JSON. Authentication failures are generic 401s:
//! the response never says whether an email exists, a password was wrong,
//! or why a token was rejected.
//!
//! # Examples
//!
//! Sign up:
//! ```bash
//! curl -X POST http://localhost:3001/api/v1/auth/signup \
//!   -H "Content-Type: application/json" \
//!   -d '{"email": "ada@example.com", "password": "Hunter2!long", "nickname": "ada"}'
//! ```
//!
//! Login:
//! ```bash
//! curl -X POST http://localhost:3001/api/v1/auth/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"email": "ada@example.com", "password": "Hunter2!long"}'
//! ```

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use snapfeed::auth::{LoginRequest, SignupRequest, UserSummary};

use super::{auth_error_response, AppState, ErrorResponse};
use crate::logging::log_security_event;
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct SignupPayload {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshPayload {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct SignupBody {
    pub access_token: String,
    pub user: SignupUser,
}

/// Signup echoes only the public identity fields
#[derive(Debug, Serialize)]
pub struct SignupUser {
    pub email: String,
    pub nickname: String,
}

#[derive(Debug, Serialize)]
pub struct LoginBody {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct RefreshBody {
    pub access_token: String,
}

/// Register a new account.
///
/// Returns `201 Created` with an access token and the public user fields.
/// No refresh token is issued at signup; the session starts at login.
///
/// # Errors
///
/// - `409 Conflict`: email or nickname already registered
/// - `500 Internal Server Error`: hashing or persistence failure
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<(StatusCode, Json<SignupBody>), (StatusCode, Json<ErrorResponse>)> {
    let request = SignupRequest {
        email: payload.email,
        password: payload.password,
        nickname: payload.nickname,
        profile_image_url: payload.profile_image_url,
    };

    match state.auth_manager.signup(request).await {
        Ok(response) => {
            metrics::signups_total();
            Ok((
                StatusCode::CREATED,
                Json(SignupBody {
                    access_token: response.access_token,
                    user: SignupUser {
                        email: response.user.email,
                        nickname: response.user.nickname,
                    },
                }),
            ))
        }
        Err(err) => Err(auth_error_response(&err)),
    }
}

/// Authenticate and start a session.
///
/// Returns `200 OK` with an access token, a refresh token, and the public
/// user view. Any prior session for this user is replaced: its refresh
/// token silently stops validating.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password, with one shared
///   generic message
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginBody>, (StatusCode, Json<ErrorResponse>)> {
    let request = LoginRequest {
        email: payload.email,
        password: payload.password,
    };

    match state.auth_manager.login(request).await {
        Ok(session) => {
            metrics::login_attempts_total("success");
            Ok(Json(LoginBody {
                access_token: session.access_token,
                refresh_token: session.refresh_token,
                user: session.user,
            }))
        }
        Err(err) => {
            metrics::login_attempts_total("failure");
            log_security_event("failed_login", None, "Login attempt rejected");
            Err(auth_error_response(&err))
        }
    }
}

/// Exchange a refresh token for a new access token.
///
/// The refresh token is not rotated; it stays valid until it expires, is
/// revoked by logout, or is replaced by the next login.
///
/// # Errors
///
/// - `401 Unauthorized`: refresh token unknown, revoked, or expired
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<Json<RefreshBody>, (StatusCode, Json<ErrorResponse>)> {
    match state.auth_manager.refresh(&payload.refresh_token).await {
        Ok(access_token) => {
            metrics::token_refresh_total("success");
            Ok(Json(RefreshBody { access_token }))
        }
        Err(err) => {
            metrics::token_refresh_total("rejected");
            Err(auth_error_response(&err))
        }
    }
}

/// Revoke a refresh token, ending the session.
///
/// Always returns `200 OK`, whatever the state of the supplied token.
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Json<serde_json::Value> {
    state.auth_manager.logout(&payload.refresh_token).await;
    Json(serde_json::json!({ "success": true }))
}

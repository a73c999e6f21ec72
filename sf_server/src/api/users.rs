//! User profile API handlers.
//!
//! All routes here are protected and operate on the authenticated user
//! only; there is no way to read or modify another account.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use snapfeed::auth::{User, UserSummary};
use snapfeed::users::ProfileUpdate;

use super::{auth_error_response, AppState, ErrorResponse};
use crate::api::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct UpdateMePayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Own profile, including timestamps but never the password hash
#[derive(Debug, Serialize)]
pub struct ProfileBody {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub profile_image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for ProfileBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            profile_image_url: user.profile_image_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Fetch the authenticated user's profile.
///
/// # Errors
///
/// - `404 Not Found`: the account behind the token no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileBody>, (StatusCode, Json<ErrorResponse>)> {
    match state.user_manager.profile(user.id).await {
        Ok(profile) => Ok(Json(ProfileBody::from(profile))),
        Err(err) => Err(auth_error_response(&err)),
    }
}

/// Update the authenticated user's profile.
///
/// Omitted fields are left untouched. A changed email or nickname is
/// re-checked for uniqueness; a new password is re-hashed before storage.
///
/// # Errors
///
/// - `409 Conflict`: email or nickname belongs to another account
/// - `404 Not Found`: the account no longer exists
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateMePayload>,
) -> Result<Json<UserSummary>, (StatusCode, Json<ErrorResponse>)> {
    let update = ProfileUpdate {
        email: payload.email,
        password: payload.password,
        nickname: payload.nickname,
        profile_image_url: payload.profile_image_url,
    };

    match state.user_manager.update(user.id, update).await {
        Ok(updated) => Ok(Json(UserSummary::from(&updated))),
        Err(err) => Err(auth_error_response(&err)),
    }
}

/// Delete the authenticated user's account.
///
/// The refresh token and all posts cascade at the store. The current
/// access token keeps verifying until it expires, but every protected
/// operation behind it will then fail on the missing account.
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    match state.user_manager.remove(user.id).await {
        Ok(()) => Ok(Json(serde_json::json!({ "success": true }))),
        Err(err) => Err(auth_error_response(&err)),
    }
}

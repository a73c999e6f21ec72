//! Post API handlers.
//!
//! Protected routes scoped to the authenticated user: create, list own
//! posts, delete own posts. There is no global feed.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use snapfeed::posts::{NewPost, Post};

use super::{post_error_response, AppState, ErrorResponse};
use crate::api::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct CreatePostPayload {
    pub image_url: String,
    pub content: Option<String>,
}

/// Create a post owned by the authenticated user.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePostPayload>,
) -> Result<(StatusCode, Json<Post>), (StatusCode, Json<ErrorResponse>)> {
    let new_post = NewPost {
        image_url: payload.image_url,
        content: payload.content,
    };

    match state.post_manager.create(user.id, new_post).await {
        Ok(post) => Ok((StatusCode::CREATED, Json(post))),
        Err(err) => Err(post_error_response(&err)),
    }
}

/// List the authenticated user's posts, newest first.
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Post>>, (StatusCode, Json<ErrorResponse>)> {
    match state.post_manager.list_for_user(user.id).await {
        Ok(posts) => Ok(Json(posts)),
        Err(err) => Err(post_error_response(&err)),
    }
}

/// Delete one of the authenticated user's posts.
///
/// # Errors
///
/// - `404 Not Found`: the post does not exist or belongs to someone else
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    match state.post_manager.remove(user.id, post_id).await {
        Ok(()) => Ok(Json(serde_json::json!({ "success": true }))),
        Err(err) => Err(post_error_response(&err)),
    }
}

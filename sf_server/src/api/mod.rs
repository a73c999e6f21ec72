//! HTTP API for the snapfeed server.
//!
//! # Architecture
//!
//! - **Axum**: Async web framework for HTTP routing
//! - **Tower**: Middleware for CORS and authentication
//! - **JWT**: Token-based authentication with access/refresh tokens
//!
//! # Modules
//!
//! - [`auth`]: Signup, login, logout, and token refresh
//! - [`users`]: Profile operations for the authenticated user
//! - [`posts`]: Ownership-scoped post operations
//! - [`middleware`]: Authentication gate for protected endpoints
//! - [`request_id`]: Request ID correlation
//!
//! # Endpoints Overview
//!
//! ## Public
//! - `GET  /health` - Server health status
//! - `POST /api/v1/auth/signup` - Register a new account
//! - `POST /api/v1/auth/login` - Login with credentials
//! - `POST /api/v1/auth/refresh` - Exchange a refresh token for an access token
//! - `POST /api/v1/auth/logout` - Revoke a refresh token
//!
//! ## Protected (require `Authorization: Bearer <access token>`)
//! - `GET    /api/v1/users/me` - Own profile
//! - `PATCH  /api/v1/users/me` - Update own profile
//! - `DELETE /api/v1/users/me` - Delete own account
//! - `POST   /api/v1/posts` - Create a post
//! - `GET    /api/v1/posts` - List own posts
//! - `DELETE /api/v1/posts/{id}` - Delete an own post

pub mod auth;
pub mod middleware;
pub mod posts;
pub mod request_id;
pub mod users;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use snapfeed::auth::AuthError;
use snapfeed::posts::PostError;
use snapfeed::{AuthManager, Database, PostManager, UserManager};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; cheap due to the Arc wrappers.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub user_manager: Arc<UserManager>,
    pub post_manager: Arc<PostManager>,
    pub database: Database,
}

/// JSON error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map an auth error to its HTTP response.
///
/// All authentication failures surface as generic 401s; internal causes are
/// logged server-side only.
pub(crate) fn auth_error_response(err: &AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        AuthError::DuplicateEmail | AuthError::DuplicateNickname => StatusCode::CONFLICT,
        AuthError::InvalidCredentials
        | AuthError::MissingToken
        | AuthError::InvalidToken
        | AuthError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
        AuthError::UserNotFound => StatusCode::NOT_FOUND,
        AuthError::Database(_) | AuthError::HashingFailed | AuthError::Jwt(_) => {
            tracing::error!(error = %err, "internal error handling auth request");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Map a post error to its HTTP response.
pub(crate) fn post_error_response(err: &PostError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        PostError::PostNotFound => StatusCode::NOT_FOUND,
        PostError::Database(_) => {
            tracing::error!(error = %err, "internal error handling post request");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Create the complete API router with all endpoints and middleware.
///
/// `cors_origin` restricts cross-origin requests to one origin when set;
/// otherwise CORS is permissive (development default).
pub fn create_router(state: AppState, cors_origin: Option<&str>) -> Router {
    let root_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", create_v1_router(state.clone()))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(build_cors(cors_origin))
        .with_state(state)
}

/// Create the API v1 router.
///
/// Public routes bypass the authentication gate entirely; the gate is
/// layered only onto the protected sub-router, so the public/protected
/// split is an explicit allow-list in the router itself.
fn create_v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout));

    let protected_routes = Router::new()
        .route(
            "/users/me",
            get(users::me).patch(users::update_me).delete(users::delete_me),
        )
        .route("/posts", post(posts::create_post).get(posts::list_posts))
        .route("/posts/{post_id}", axum::routing::delete(posts::delete_post))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

fn build_cors(origin: Option<&str>) -> CorsLayer {
    match origin.and_then(|o| o.parse::<HeaderValue>().ok()) {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    }
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the database answers, `503` otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = state.database.health_check().await.is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}

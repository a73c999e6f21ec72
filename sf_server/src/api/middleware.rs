//! Authentication middleware for protected endpoints.
//!
//! Extracts and verifies the JWT access token from the `Authorization`
//! header, then injects the authenticated identity into request extensions
//! for downstream handlers. Layered only onto protected routes; public
//! routes never reach it.
//!
//! # Extracting the identity
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use sf_server::api::middleware::AuthUser;
//!
//! async fn protected_handler(Extension(user): Extension<AuthUser>) -> String {
//!     format!("Authenticated as user {}", user.id)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use snapfeed::auth::{AuthError, UserId};

use super::{auth_error_response, AppState, ErrorResponse};
use crate::logging::log_security_event;
use crate::metrics;

/// Identity resolved from a verified access token.
///
/// Carries exactly what the token claims; the user row is not re-fetched
/// per request, so a token stays usable until it expires even if the
/// account changes underneath it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
}

/// Authentication gate validating bearer tokens on protected routes.
///
/// # Behavior
///
/// - No `Authorization` header, or any scheme other than `Bearer`:
///   `401` with the missing-token message
/// - Token fails verification (expired, malformed, bad signature):
///   `401` with the invalid-token message, cause logged server-side only
/// - Token valid: injects [`AuthUser`] into request extensions and calls
///   the next handler
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let bearer_token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = match bearer_token {
        Some(token) => token,
        None => {
            metrics::auth_gate_rejections_total("missing_token");
            return Err(auth_error_response(&AuthError::MissingToken));
        }
    };

    match state.auth_manager.verify_access_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser {
                id: claims.sub,
                email: claims.email,
            });
            Ok(next.run(request).await)
        }
        Err(err) => {
            metrics::auth_gate_rejections_total("invalid_token");
            log_security_event("invalid_token", None, "Rejected bearer token");
            tracing::debug!(error = %err, "access token verification failed");
            Err(auth_error_response(&AuthError::InvalidToken))
        }
    }
}

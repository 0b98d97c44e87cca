// handlers/protected/auth/session.rs - session introspection and teardown

use axum::{extract::State, Extension};
use axum_extra::extract::cookie::CookieJar;

use crate::database::models::{PostBody, UserBody};
use crate::database::{Posts, Users};
use crate::error::ApiError;
use crate::middleware::auth::session_cookie_named;
use crate::middleware::{ApiMessage, ApiResponse, AuthUser};
use crate::state::AppState;

/// GET /api/v1/me - Current authenticated user with populated posts
///
/// Returns the fresh user body for the session's subject, owner-list
/// populated most-recent-first. A session whose user no longer exists is
/// treated as unauthenticated, not as a server error.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<ApiResponse<UserBody>, ApiError> {
    let user = Users::new(state.pool.clone())
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Please log in to continue"))?;

    let posts = Posts::new(state.pool.clone())
        .find_listed(&user.posts)
        .await?
        .into_iter()
        .map(PostBody::from)
        .collect();

    Ok(ApiResponse::success(user.into_body(posts)))
}

/// GET /api/v1/auth/logout - Close the current session
///
/// The cookie is removed client-side; the token itself simply ages out.
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiMessage) {
    (
        jar.remove(session_cookie_named()),
        ApiMessage::ok("Logged out successfully"),
    )
}

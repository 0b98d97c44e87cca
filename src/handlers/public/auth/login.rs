// handlers/public/auth/login.rs - POST /api/v1/auth/login handler

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use validator::Validate;

use crate::auth;
use crate::database::models::{PostBody, UserBody};
use crate::database::{Posts, Users};
use crate::error::ApiError;
use crate::middleware::auth::session_cookie;
use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Password must be 6-20 characters"))]
    pub password: String,
}

/// POST /api/v1/auth/login - Authenticate and open a session
///
/// Expected Input:
/// ```json
/// {
///   "email": "string",      // Required
///   "password": "string"    // Required
/// }
/// ```
///
/// On success the session cookie is set and the user body is returned with
/// the owner-list populated, most-recent-first. Unknown email and wrong
/// password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<UserBody>), ApiError> {
    payload.validate()?;

    let users = Users::new(state.pool.clone());

    let user = users
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !auth::verify_password(&payload.password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = auth::generate_session_token(user.id)?;
    let jar = jar.add(session_cookie(token));

    let posts = Posts::new(state.pool.clone())
        .find_listed(&user.posts)
        .await?
        .into_iter()
        .map(PostBody::from)
        .collect();

    tracing::info!(user_id = %user.id, "user logged in");

    Ok((jar, ApiResponse::success(user.into_body(posts))))
}

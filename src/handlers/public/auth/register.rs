// handlers/public/auth/register.rs - POST /api/v1/auth/register handler

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use validator::Validate;

use crate::auth;
use crate::database::models::UserBody;
use crate::database::Users;
use crate::error::ApiError;
use crate::middleware::auth::session_cookie;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// Field limits mirror the signup form schema: name 2-30, valid email,
/// password 6-20.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 30, message = "Please enter your name"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Password must be 6-20 characters"))]
    pub password: String,
}

/// POST /api/v1/auth/register - Create a new account and open a session
///
/// Expected Input:
/// ```json
/// {
///   "name": "string",       // Required: 2-30 characters
///   "email": "string",      // Required: unique, valid address
///   "password": "string"    // Required: 6-20 characters
/// }
/// ```
///
/// Expected Output (Success): `201` with the session cookie set and
/// `{"success": true, "data": { user body, "posts": [] }}`.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(CookieJar, ApiResponse<UserBody>), ApiError> {
    payload.validate()?;

    let users = Users::new(state.pool.clone());

    if users.email_taken(&payload.email).await? {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = users
        .insert(&payload.name, &payload.email, &password_hash)
        .await?;

    tracing::info!(user_id = %user.id, "registered new user");

    let token = auth::generate_session_token(user.id)?;
    let jar = jar.add(session_cookie(token));

    // A fresh account owns no posts yet
    Ok((jar, ApiResponse::created(user.into_body(vec![]))))
}

use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated user context extracted from the session cookie
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

/// Session guard: validates the signed cookie and injects the resolved
/// identity into the request. Requests without a valid session never reach
/// the business handlers.
pub async fn session_auth_middleware(
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_name = &config::config().security.session_cookie;

    let token = jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("Please log in to continue"))?;

    let claims = auth::verify_session_token(&token)?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Build the session cookie set at login/registration. Expiry is enforced
/// by the token itself, so the cookie carries no Max-Age.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((config::config().security.session_cookie.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie matching `session_cookie` in name and path, used to clear the
/// session at logout.
pub fn session_cookie_named() -> Cookie<'static> {
    Cookie::build((config::config().security.session_cookie.clone(), ""))
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_and_scoped_to_root() {
        let cookie = session_cookie("abc".to_string());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn claims_resolve_to_auth_user() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id);
        let auth_user = AuthUser::from(claims);
        assert_eq!(auth_user.user_id, user_id);
    }
}

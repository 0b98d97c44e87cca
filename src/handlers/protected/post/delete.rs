// handlers/protected/post/delete.rs - DELETE /api/v1/post/:id handler

use axum::extract::{Path, State};
use axum::Extension;
use uuid::Uuid;

use crate::database::{Posts, Users};
use crate::error::ApiError;
use crate::middleware::{ApiMessage, AuthUser};
use crate::state::AppState;

/// DELETE /api/v1/post/:id - Delete one of the caller's posts
///
/// Not-found and not-owned are reported distinctly (404 vs 403). The
/// remote asset is destroyed best-effort before the row goes away; a
/// destroy failure is logged and does not fail the request.
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiMessage, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid post id"))?;

    let posts = Posts::new(state.pool.clone());

    let post = posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.owner != auth_user.user_id {
        return Err(ApiError::forbidden("You are not allowed to delete this post"));
    }

    if let Err(e) = state.media.delete(&post.image_public_id).await {
        tracing::warn!(
            post_id = %post.id,
            public_id = %post.image_public_id,
            error = %e,
            "failed to remove remote image"
        );
    }

    posts.delete(post.id).await?;

    let unlinked = Users::new(state.pool.clone())
        .remove_post(auth_user.user_id, post.id)
        .await?;

    if !unlinked {
        tracing::warn!(
            post_id = %post.id,
            owner = %auth_user.user_id,
            "owner row missing while unlinking deleted post"
        );
    }

    tracing::info!(post_id = %post.id, owner = %auth_user.user_id, "post deleted");

    Ok(ApiMessage::ok("Post deleted."))
}

// handlers/protected/post/create.rs - POST /api/v1/post/create handler

use std::path::PathBuf;

use axum::extract::{Multipart, State};
use axum::Extension;
use uuid::Uuid;

use crate::config;
use crate::database::{Posts, Users};
use crate::error::ApiError;
use crate::middleware::{ApiMessage, AuthUser};
use crate::state::AppState;

/// POST /api/v1/post/create - Create a post from a multipart upload
///
/// Expected Input: multipart form with exactly one `image` file part and an
/// optional `caption` text part.
///
/// Sequence: spool the file locally, hand it to the media store under the
/// configured folder, insert the Post row, then prepend the new id to the
/// owner-list. The steps are not transactional; a failure after the insert
/// leaves the post unlinked rather than rolling it back.
///
/// Expected Output (Success): `201 {"success": true, "message": "Post created."}`
/// - the created post is not echoed back; clients re-fetch /me.
pub async fn create(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    mut multipart: Multipart,
) -> Result<ApiMessage, ApiError> {
    let mut caption = String::new();
    let mut spooled: Option<PathBuf> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("caption") => {
                caption = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Malformed caption field: {}", e)))?;
            }
            Some("image") => {
                spooled = Some(spool_field(field).await?);
            }
            _ => {}
        }
    }

    let Some(spooled) = spooled else {
        return Err(ApiError::bad_request("Please enter all fields"));
    };

    let upload_result = state
        .media
        .upload(&spooled, &config::config().media.upload_folder)
        .await;

    // Spool file is finished with either way; removal failures are logged only
    if let Err(e) = tokio::fs::remove_file(&spooled).await {
        tracing::warn!(path = %spooled.display(), error = %e, "failed to remove spooled upload");
    }

    let uploaded = upload_result?;

    // Defensive: the guard has already resolved the identity, but a post
    // must never be created without an owner.
    let Some(Extension(auth_user)) = auth_user else {
        return Err(ApiError::unauthorized("Unauthorized. User not found."));
    };

    let post = Posts::new(state.pool.clone())
        .insert(&caption, &uploaded.public_id, &uploaded.url, auth_user.user_id)
        .await?;

    let linked = Users::new(state.pool.clone())
        .prepend_post(auth_user.user_id, post.id)
        .await?;

    if !linked {
        // Accepted: the post exists but is not reachable from the owner-list.
        tracing::warn!(
            post_id = %post.id,
            owner = %auth_user.user_id,
            "owner row missing after post insert; post left unlinked"
        );
    }

    tracing::info!(post_id = %post.id, owner = %auth_user.user_id, "post created");

    Ok(ApiMessage::created("Post created."))
}

/// Write one multipart file field to the spool directory, preserving the
/// original extension. The media store consumes the file from disk.
async fn spool_field(field: axum::extract::multipart::Field<'_>) -> Result<PathBuf, ApiError> {
    let extension = field
        .file_name()
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()));

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed image field: {}", e)))?;

    let upload_dir = PathBuf::from(&config::config().server.upload_dir);
    tokio::fs::create_dir_all(&upload_dir).await.map_err(|e| {
        tracing::error!(error = %e, "failed to create upload spool directory");
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    let mut file_name = Uuid::new_v4().simple().to_string();
    if let Some(ext) = extension {
        file_name = format!("{}.{}", file_name, ext);
    }

    let path = upload_dir.join(file_name);
    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        tracing::error!(error = %e, "failed to spool upload");
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    Ok(path)
}

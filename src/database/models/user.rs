use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::models::post::PostBody;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Owner-list: ids of this user's posts, most-recent-first.
    pub posts: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API shape for a user. The credential hash never leaves the database
/// layer, and the owner-list is populated into full posts for the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBody {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub posts: Vec<PostBody>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn into_body(self, posts: Vec<PostBody>) -> UserBody {
        UserBody {
            id: self.id,
            name: self.name,
            email: self.email,
            posts,
            created_at: self.created_at,
        }
    }
}

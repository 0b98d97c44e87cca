use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub caption: String,
    pub image_public_id: String,
    pub image_url: String,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Image reference returned by the media store and echoed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub public_id: String,
    pub url: String,
}

/// API shape for a post: the flat image columns nest under "image".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostBody {
    pub id: Uuid,
    pub caption: String,
    pub image: ImageRef,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostBody {
    fn from(post: Post) -> Self {
        PostBody {
            id: post.id,
            caption: post.caption,
            image: ImageRef {
                public_id: post.image_public_id,
                url: post.image_url,
            },
            owner: post.owner,
            created_at: post.created_at,
        }
    }
}

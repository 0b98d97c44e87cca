use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Post;

/// Post repository
pub struct Posts {
    pool: PgPool,
}

impl Posts {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        caption: &str,
        image_public_id: &str,
        image_url: &str,
        owner: Uuid,
    ) -> Result<Post, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, caption, image_public_id, image_url, owner)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, caption, image_public_id, image_url, owner, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(caption)
        .bind(image_public_id)
        .bind(image_url)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, caption, image_public_id, image_url, owner, created_at
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Fetch the posts named by an owner-list, returned in the list's own
    /// order (the array is most-recent-first; the table has no such order).
    pub async fn find_listed(&self, ids: &[Uuid]) -> Result<Vec<Post>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = sqlx::query_as::<_, Post>(
            "SELECT id, caption, image_public_id, image_url, owner, created_at
             FROM posts WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<Uuid, Post> = rows.into_iter().map(|p| (p.id, p)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Delete a post row. Returns false if no row matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

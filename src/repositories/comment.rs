//! Comment repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: Uuid,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment row joined with its author's public profile fields
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithOwner {
    pub id: Uuid,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: String,
}

/// Comment repository for database operations
pub struct CommentRepository;

impl CommentRepository {
    /// Add a comment to a video
    pub async fn create(
        pool: &PgPool,
        video_id: Uuid,
        owner_id: Uuid,
        content: &str,
    ) -> Result<CommentRecord> {
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            INSERT INTO comments (video_id, owner_id, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(video_id)
        .bind(owner_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Find a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CommentRecord>> {
        let comment = sqlx::query_as::<_, CommentRecord>(r#"SELECT * FROM comments WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(comment)
    }

    /// Check if a comment exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1)"#)
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// List a video's comments, newest first, paginated
    pub async fn list_by_video(
        pool: &PgPool,
        video_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CommentWithOwner>, i64)> {
        let comments = sqlx::query_as::<_, CommentWithOwner>(
            r#"
            SELECT c.id, c.video_id, c.owner_id, c.content, c.created_at,
                   u.username AS owner_username,
                   u.full_name AS owner_full_name,
                   u.avatar_url AS owner_avatar_url
            FROM comments c
            JOIN users u ON u.id = c.owner_id
            WHERE c.video_id = $1
            ORDER BY c.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(video_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM comments WHERE video_id = $1"#)
                .bind(video_id)
                .fetch_one(pool)
                .await?;

        Ok((comments, total))
    }

    /// Update a comment's content
    pub async fn update_content(pool: &PgPool, id: Uuid, content: &str) -> Result<CommentRecord> {
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            UPDATE comments SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Delete a comment
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<()> {
        sqlx::query(r#"DELETE FROM comments WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Integration tests require database - see tests/ directory
}

//! Tweet repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Tweet row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TweetRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tweet repository for database operations
pub struct TweetRepository;

impl TweetRepository {
    /// Create a tweet
    pub async fn create(pool: &PgPool, owner_id: Uuid, content: &str) -> Result<TweetRecord> {
        let tweet = sqlx::query_as::<_, TweetRecord>(
            r#"
            INSERT INTO tweets (owner_id, content)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(tweet)
    }

    /// Find a tweet by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<TweetRecord>> {
        let tweet = sqlx::query_as::<_, TweetRecord>(r#"SELECT * FROM tweets WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(tweet)
    }

    /// Check if a tweet exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM tweets WHERE id = $1)"#)
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// List a user's tweets, newest first, paginated
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TweetRecord>, i64)> {
        let tweets = sqlx::query_as::<_, TweetRecord>(
            r#"
            SELECT * FROM tweets
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM tweets WHERE owner_id = $1"#)
                .bind(owner_id)
                .fetch_one(pool)
                .await?;

        Ok((tweets, total))
    }

    /// Update a tweet's content
    pub async fn update_content(pool: &PgPool, id: Uuid, content: &str) -> Result<TweetRecord> {
        let tweet = sqlx::query_as::<_, TweetRecord>(
            r#"
            UPDATE tweets SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(tweet)
    }

    /// Delete a tweet
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<()> {
        sqlx::query(r#"DELETE FROM tweets WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

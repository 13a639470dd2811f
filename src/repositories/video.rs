//! Video repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Video row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_secs: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video row joined with its owner's public profile fields
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VideoWithOwner {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_secs: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar_url: String,
}

/// Input for publishing a video
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_secs: f64,
}

/// Sort key for video listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSort {
    #[default]
    CreatedAt,
    Views,
    Title,
    Duration,
}

impl VideoSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt),
            "views" => Some(Self::Views),
            "title" => Some(Self::Title),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }

    // Column names are fixed here; user input never reaches the query text
    fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "v.created_at",
            Self::Views => "v.views",
            Self::Title => "v.title",
            Self::Duration => "v.duration_secs",
        }
    }
}

/// Video repository for database operations
pub struct VideoRepository;

impl VideoRepository {
    /// Publish a new video
    pub async fn create(pool: &PgPool, video: NewVideo) -> Result<VideoRecord> {
        let record = sqlx::query_as::<_, VideoRecord>(
            r#"
            INSERT INTO videos (owner_id, title, description, video_url, thumbnail_url, duration_secs)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(video.owner_id)
        .bind(video.title)
        .bind(video.description)
        .bind(video.video_url)
        .bind(video.thumbnail_url)
        .bind(video.duration_secs)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find a video by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<VideoRecord>> {
        let video = sqlx::query_as::<_, VideoRecord>(r#"SELECT * FROM videos WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(video)
    }

    /// Check if a video exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)"#)
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// List a channel's videos with optional title search, sorted and paginated
    ///
    /// Unpublished videos are only included when `include_unpublished` is set
    /// (i.e. the viewer is the channel owner).
    #[allow(clippy::too_many_arguments)]
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        include_unpublished: bool,
        title_query: Option<&str>,
        sort: VideoSort,
        descending: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<VideoWithOwner>, i64)> {
        let direction = if descending { "DESC" } else { "ASC" };
        let sql = format!(
            r#"
            SELECT v.id, v.owner_id, v.title, v.description, v.video_url,
                   v.thumbnail_url, v.duration_secs, v.views, v.is_published,
                   v.created_at,
                   u.username AS owner_username,
                   u.full_name AS owner_full_name,
                   u.avatar_url AS owner_avatar_url
            FROM videos v
            JOIN users u ON u.id = v.owner_id
            WHERE v.owner_id = $1
              AND (v.is_published OR $2)
              AND ($3::text IS NULL OR v.title ILIKE '%' || $3 || '%')
            ORDER BY {} {}
            LIMIT $4 OFFSET $5
            "#,
            sort.column(),
            direction
        );

        let videos = sqlx::query_as::<_, VideoWithOwner>(&sql)
            .bind(owner_id)
            .bind(include_unpublished)
            .bind(title_query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM videos
            WHERE owner_id = $1
              AND (is_published OR $2)
              AND ($3::text IS NULL OR title ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(owner_id)
        .bind(include_unpublished)
        .bind(title_query)
        .fetch_one(pool)
        .await?;

        Ok((videos, total))
    }

    /// Record a view
    pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<()> {
        sqlx::query(r#"UPDATE videos SET views = views + 1 WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Total videos and accumulated views for a channel
    pub async fn channel_totals(pool: &PgPool, owner_id: Uuid) -> Result<(i64, i64)> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(views), 0)::bigint
            FROM videos
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_sort_parse() {
        assert_eq!(VideoSort::parse("views"), Some(VideoSort::Views));
        assert_eq!(VideoSort::parse("created_at"), Some(VideoSort::CreatedAt));
        assert_eq!(VideoSort::parse("owner_id; DROP TABLE videos"), None);
    }
}

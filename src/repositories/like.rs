//! Like repository for database operations
//!
//! A like targets exactly one of video/comment/tweet and is toggled:
//! liking twice removes the like. Uniqueness per (owner, target) is
//! enforced by partial unique indexes.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::video::VideoWithOwner;

/// What a like points at
#[derive(Debug, Clone, Copy)]
pub enum LikeTarget {
    Video(Uuid),
    Comment(Uuid),
    Tweet(Uuid),
}

impl LikeTarget {
    // Fixed column names; target ids are always bound, never interpolated
    fn column(self) -> &'static str {
        match self {
            Self::Video(_) => "video_id",
            Self::Comment(_) => "comment_id",
            Self::Tweet(_) => "tweet_id",
        }
    }

    fn id(self) -> Uuid {
        match self {
            Self::Video(id) | Self::Comment(id) | Self::Tweet(id) => id,
        }
    }
}

/// Like repository for database operations
pub struct LikeRepository;

impl LikeRepository {
    /// Toggle a like; returns true if the target is now liked
    pub async fn toggle(pool: &PgPool, owner_id: Uuid, target: LikeTarget) -> Result<bool> {
        let column = target.column();

        let deleted = sqlx::query(&format!(
            r#"DELETE FROM likes WHERE owner_id = $1 AND {column} = $2"#
        ))
        .bind(owner_id)
        .bind(target.id())
        .execute(pool)
        .await?
        .rows_affected();

        if deleted > 0 {
            return Ok(false);
        }

        // A concurrent like between the delete and this insert trips the
        // unique index; treat that as already-liked
        let inserted = sqlx::query(&format!(
            r#"
            INSERT INTO likes (owner_id, {column})
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#
        ))
        .bind(owner_id)
        .bind(target.id())
        .execute(pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }

    /// List the videos a user has liked, most recently liked first
    pub async fn list_liked_videos(
        pool: &PgPool,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<VideoWithOwner>, i64)> {
        let videos = sqlx::query_as::<_, VideoWithOwner>(
            r#"
            SELECT v.id, v.owner_id, v.title, v.description, v.video_url,
                   v.thumbnail_url, v.duration_secs, v.views, v.is_published,
                   v.created_at,
                   u.username AS owner_username,
                   u.full_name AS owner_full_name,
                   u.avatar_url AS owner_avatar_url
            FROM likes l
            JOIN videos v ON v.id = l.video_id
            JOIN users u ON u.id = v.owner_id
            WHERE l.owner_id = $1 AND l.video_id IS NOT NULL
            ORDER BY l.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM likes WHERE owner_id = $1 AND video_id IS NOT NULL"#,
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok((videos, total))
    }

    /// Total likes across all of a channel's videos (dashboard stat)
    pub async fn count_channel_video_likes(pool: &PgPool, channel_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM likes l
            JOIN videos v ON v.id = l.video_id
            WHERE v.owner_id = $1
            "#,
        )
        .bind(channel_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_columns_are_fixed() {
        let id = Uuid::new_v4();
        assert_eq!(LikeTarget::Video(id).column(), "video_id");
        assert_eq!(LikeTarget::Comment(id).column(), "comment_id");
        assert_eq!(LikeTarget::Tweet(id).column(), "tweet_id");
        assert_eq!(LikeTarget::Video(id).id(), id);
    }
}

//! Playlist repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::video::VideoWithOwner;

/// Playlist row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaylistRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Playlist repository for database operations
pub struct PlaylistRepository;

impl PlaylistRepository {
    /// Create a playlist
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        name: &str,
        description: &str,
    ) -> Result<PlaylistRecord> {
        let playlist = sqlx::query_as::<_, PlaylistRecord>(
            r#"
            INSERT INTO playlists (owner_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await?;

        Ok(playlist)
    }

    /// Check whether an owner already has a playlist with this name
    pub async fn name_exists(pool: &PgPool, owner_id: Uuid, name: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM playlists WHERE owner_id = $1 AND name = $2)"#,
        )
        .bind(owner_id)
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Find a playlist by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PlaylistRecord>> {
        let playlist =
            sqlx::query_as::<_, PlaylistRecord>(r#"SELECT * FROM playlists WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(playlist)
    }

    /// List a user's playlists, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<PlaylistRecord>> {
        let playlists = sqlx::query_as::<_, PlaylistRecord>(
            r#"SELECT * FROM playlists WHERE owner_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(playlists)
    }

    /// Update name and/or description (unset fields keep their value)
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<PlaylistRecord> {
        let playlist = sqlx::query_as::<_, PlaylistRecord>(
            r#"
            UPDATE playlists
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await?;

        Ok(playlist)
    }

    /// Delete a playlist (membership rows cascade)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<()> {
        sqlx::query(r#"DELETE FROM playlists WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Append a video to a playlist; no-op if it is already a member
    pub async fn add_video(pool: &PgPool, playlist_id: Uuid, video_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO playlist_videos (playlist_id, video_id, position)
            SELECT $1, $2, COALESCE(MAX(position), 0) + 1
            FROM playlist_videos
            WHERE playlist_id = $1
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(playlist_id)
        .bind(video_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Remove a video from a playlist
    pub async fn remove_video(pool: &PgPool, playlist_id: Uuid, video_id: Uuid) -> Result<()> {
        sqlx::query(r#"DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2"#)
            .bind(playlist_id)
            .bind(video_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// The playlist's member videos in playlist order
    pub async fn list_videos(pool: &PgPool, playlist_id: Uuid) -> Result<Vec<VideoWithOwner>> {
        let videos = sqlx::query_as::<_, VideoWithOwner>(
            r#"
            SELECT v.id, v.owner_id, v.title, v.description, v.video_url,
                   v.thumbnail_url, v.duration_secs, v.views, v.is_published,
                   v.created_at,
                   u.username AS owner_username,
                   u.full_name AS owner_full_name,
                   u.avatar_url AS owner_avatar_url
            FROM playlist_videos pv
            JOIN videos v ON v.id = pv.video_id
            JOIN users u ON u.id = v.owner_id
            WHERE pv.playlist_id = $1
            ORDER BY pv.position
            "#,
        )
        .bind(playlist_id)
        .fetch_all(pool)
        .await?;

        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    // Integration tests require database - see tests/ directory
}

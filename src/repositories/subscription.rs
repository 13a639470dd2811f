//! Subscription repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// A subscriber or subscribed-to channel, as seen in listings
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    pub subscribed_at: DateTime<Utc>,
}

/// Subscription repository for database operations
pub struct SubscriptionRepository;

impl SubscriptionRepository {
    /// Toggle a subscription; returns true if now subscribed
    pub async fn toggle(pool: &PgPool, subscriber_id: Uuid, channel_id: Uuid) -> Result<bool> {
        let deleted = sqlx::query(
            r#"DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2"#,
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(pool)
        .await?
        .rows_affected();

        if deleted > 0 {
            return Ok(false);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO subscriptions (subscriber_id, channel_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }

    /// List the users subscribed to a channel
    pub async fn list_subscribers(pool: &PgPool, channel_id: Uuid) -> Result<Vec<ChannelProfile>> {
        let subscribers = sqlx::query_as::<_, ChannelProfile>(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url,
                   s.created_at AS subscribed_at
            FROM subscriptions s
            JOIN users u ON u.id = s.subscriber_id
            WHERE s.channel_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(channel_id)
        .fetch_all(pool)
        .await?;

        Ok(subscribers)
    }

    /// List the channels a user is subscribed to
    pub async fn list_subscribed_channels(
        pool: &PgPool,
        subscriber_id: Uuid,
    ) -> Result<Vec<ChannelProfile>> {
        let channels = sqlx::query_as::<_, ChannelProfile>(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url,
                   s.created_at AS subscribed_at
            FROM subscriptions s
            JOIN users u ON u.id = s.channel_id
            WHERE s.subscriber_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(subscriber_id)
        .fetch_all(pool)
        .await?;

        Ok(channels)
    }

    /// Number of subscribers a channel has (dashboard stat)
    pub async fn count_subscribers(pool: &PgPool, channel_id: Uuid) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM subscriptions WHERE channel_id = $1"#)
                .bind(channel_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

//! User repository for database operations
//!
//! Two projections exist on purpose: `UserRecord` carries the credential
//! columns (password hash, stored refresh token) and is only used by the
//! auth flows; `PublicUserRecord` excludes them and is what everything
//! else sees.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Full user row, including credential columns. Never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User row without credential columns
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PublicUserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub password_hash: String,
}

const PUBLIC_COLUMNS: &str =
    "id, username, email, full_name, avatar_url, cover_image_url, created_at";

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(pool: &PgPool, user: NewUser) -> Result<PublicUserRecord> {
        let record = sqlx::query_as::<_, PublicUserRecord>(&format!(
            r#"
            INSERT INTO users (username, email, full_name, avatar_url, cover_image_url, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PUBLIC_COLUMNS}
            "#,
        ))
        .bind(user.username)
        .bind(user.email)
        .bind(user.full_name)
        .bind(user.avatar_url)
        .bind(user.cover_image_url)
        .bind(user.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Check if a username or email is already taken
    pub async fn username_or_email_exists(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Find a user by username or email (full record, for credential checks)
    pub async fn find_by_login(
        pool: &PgPool,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT *
            FROM users
            WHERE ($1::text IS NOT NULL AND username = $1)
               OR ($2::text IS NOT NULL AND email = $2)
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID (full record, for credential checks)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT * FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID, excluding credential columns
    pub async fn find_public_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PublicUserRecord>> {
        let user = sqlx::query_as::<_, PublicUserRecord>(&format!(
            r#"
            SELECT {PUBLIC_COLUMNS} FROM users WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find a user by username, excluding credential columns
    pub async fn find_public_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<PublicUserRecord>> {
        let user = sqlx::query_as::<_, PublicUserRecord>(&format!(
            r#"
            SELECT {PUBLIC_COLUMNS} FROM users WHERE username = $1
            "#,
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Check if a user exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)"#)
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Replace the stored refresh token in a single atomic update
    ///
    /// Passing `None` clears the token (logout). Concurrent writers are
    /// resolved by the database: the last writer's token wins and any token
    /// issued earlier stops matching.
    pub async fn set_refresh_token(
        pool: &PgPool,
        id: Uuid,
        refresh_token: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET refresh_token = $2, updated_at = NOW() WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(refresh_token)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Store a new password hash and revoke the active session
    pub async fn update_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, refresh_token = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Update the mutable account details
    pub async fn update_details(
        pool: &PgPool,
        id: Uuid,
        full_name: &str,
        email: &str,
    ) -> Result<Option<PublicUserRecord>> {
        let user = sqlx::query_as::<_, PublicUserRecord>(&format!(
            r#"
            UPDATE users
            SET full_name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {PUBLIC_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(full_name)
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replace the avatar URL
    pub async fn update_avatar(
        pool: &PgPool,
        id: Uuid,
        avatar_url: &str,
    ) -> Result<Option<PublicUserRecord>> {
        let user = sqlx::query_as::<_, PublicUserRecord>(&format!(
            r#"
            UPDATE users SET avatar_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PUBLIC_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(avatar_url)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replace the cover image URL
    pub async fn update_cover_image(
        pool: &PgPool,
        id: Uuid,
        cover_image_url: &str,
    ) -> Result<Option<PublicUserRecord>> {
        let user = sqlx::query_as::<_, PublicUserRecord>(&format!(
            r#"
            UPDATE users SET cover_image_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PUBLIC_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(cover_image_url)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

//! User service: registration, session lifecycle and profile maintenance
//!
//! The session lifecycle is Anonymous -> Authenticated -> Anonymous.
//! `issue_tokens` is the single rotation point: every call replaces the
//! stored refresh token, so at most one refresh token per user is ever
//! usable.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserRepository};
use crate::storage::MediaStore;
use crate::types::{AuthTokens, LoginResponse, UserProfile};
use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;

/// An uploaded file, as received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Input for registration
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub avatar: Option<UploadedFile>,
    pub cover_image: Option<UploadedFile>,
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Issue a fresh access/refresh token pair for a user
    ///
    /// Persists the new refresh token onto the user row before returning,
    /// atomically replacing any prior value. If persistence fails, no
    /// tokens are returned: either both tokens exist and the refresh token
    /// is stored, or the attempt failed as a whole.
    pub async fn issue_tokens(
        pool: &PgPool,
        jwt_service: &JwtService,
        user_id: Uuid,
    ) -> Result<AuthTokens, ApiError> {
        let access_token = jwt_service
            .generate_access_token(user_id)
            .map_err(ApiError::Internal)?;
        let refresh_token = jwt_service
            .generate_refresh_token(user_id)
            .map_err(ApiError::Internal)?;

        UserRepository::set_refresh_token(pool, user_id, Some(&refresh_token))
            .await
            .map_err(ApiError::Internal)?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.access_token_expiry_secs(),
        })
    }

    /// Register a new user
    ///
    /// Creates the account only; no session is issued. Login is a separate
    /// step. All validation happens before any file is stored or any row
    /// written.
    pub async fn register(
        pool: &PgPool,
        media: &MediaStore,
        input: RegisterInput,
    ) -> Result<UserProfile, ApiError> {
        let username = input.username.trim().to_lowercase();
        let email = input.email.trim().to_string();
        let full_name = input.full_name.trim().to_string();

        if username.is_empty()
            || email.is_empty()
            || full_name.is_empty()
            || input.password.trim().is_empty()
        {
            return Err(ApiError::Validation("All fields are required".to_string()));
        }
        if !email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        let Some(avatar) = input.avatar else {
            return Err(ApiError::Validation("Avatar is required".to_string()));
        };

        if UserRepository::username_or_email_exists(pool, &username, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        let avatar_url = media
            .store(&avatar.file_name, &avatar.bytes)
            .await
            .map_err(ApiError::Internal)?;
        let cover_image_url = match input.cover_image {
            Some(cover) => Some(
                media
                    .store(&cover.file_name, &cover.bytes)
                    .await
                    .map_err(ApiError::Internal)?,
            ),
            None => None,
        };

        // Hash on the blocking thread pool (CPU-intensive)
        let password_hash = PasswordService::hash_async(input.password)
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(
            pool,
            NewUser {
                username,
                email,
                full_name,
                avatar_url,
                cover_image_url,
                password_hash,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(user.into())
    }

    /// Login with username or email plus password
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        username: Option<&str>,
        email: Option<&str>,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        if username.is_none() && email.is_none() {
            return Err(ApiError::BadRequest(
                "Username or email is required".to_string(),
            ));
        }

        let user = UserRepository::find_by_login(pool, username, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Incorrect password".to_string()));
        }

        let tokens = Self::issue_tokens(pool, jwt_service, user.id).await?;

        let profile = UserRepository::find_public_by_id(pool, user.id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(LoginResponse {
            user: profile.into(),
            tokens,
        })
    }

    /// Rotate a session's tokens using its refresh token
    ///
    /// The presented token must pass signature/expiry checks AND exactly
    /// match the stored value; the equality check is what makes logout and
    /// rotation effective against stateless bearer tokens.
    pub async fn refresh(
        pool: &PgPool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt_service
            .validate_refresh_token(refresh_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            return Err(ApiError::Unauthorized(
                "Refresh token has been revoked".to_string(),
            ));
        }

        // Full rotation: the old refresh token stops matching the instant
        // the new one is stored
        Self::issue_tokens(pool, jwt_service, user.id).await
    }

    /// Clear the stored refresh token
    ///
    /// Idempotent: logging out twice clears an already-null field.
    pub async fn logout(pool: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
        UserRepository::set_refresh_token(pool, user_id, None)
            .await
            .map_err(ApiError::Internal)?;
        Ok(())
    }

    /// Change the password, verifying the old one first
    ///
    /// Also clears the stored refresh token, revoking the active session;
    /// the caller must log in again with the new password.
    pub async fn change_password(
        pool: &PgPool,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        if old_password.trim().is_empty() || new_password.trim().is_empty() {
            return Err(ApiError::Validation("All fields are required".to_string()));
        }

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let valid =
            PasswordService::verify_async(old_password.to_string(), user.password_hash.clone())
                .await
                .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized(
                "Incorrect current password".to_string(),
            ));
        }

        let password_hash = PasswordService::hash_async(new_password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        UserRepository::update_password(pool, user.id, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        Ok(())
    }
}

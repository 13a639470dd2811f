//! User and session routes
//!
//! Registration, login/logout, token refresh, password change and profile
//! maintenance. Login and refresh set the `accessToken`/`refreshToken`
//! cookies (httpOnly, secure); logout and password change clear them.

use crate::auth::{CurrentUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::error::{ApiError, ApiResult};
use crate::repositories::UserRepository;
use crate::services::{RegisterInput, UploadedFile, UserService};
use crate::state::AppState;
use crate::types::{
    AuthTokens, ChangePasswordRequest, LoginRequest, LoginResponse, RefreshTokenRequest,
    UpdateDetailsRequest, UserProfile,
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{json, Value};
use tracing::info;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
        .route("/change-password", patch(change_password))
        .route("/current-user", get(current_user))
        .route("/update-details", patch(update_details))
        .route("/update-avatar", patch(update_avatar))
        .route("/update-cover-image", patch(update_cover_image))
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::from(name);
    cookie.set_path("/");
    cookie
}

fn set_session_cookies(jar: CookieJar, tokens: &AuthTokens) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
    ))
}

fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(removal_cookie(ACCESS_TOKEN_COOKIE))
        .remove(removal_cookie(REFRESH_TOKEN_COOKIE))
}

/// Register a new user
///
/// POST /api/v1/users/register (multipart: username, email, full_name,
/// password, avatar file, optional cover_image file)
async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let mut input = RegisterInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart form: {}", e)))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "username" => input.username = read_text(field).await?,
            "email" => input.email = read_text(field).await?,
            "full_name" => input.full_name = read_text(field).await?,
            "password" => input.password = read_text(field).await?,
            "avatar" => input.avatar = Some(read_file(field, "avatar").await?),
            "cover_image" => input.cover_image = Some(read_file(field, "cover_image").await?),
            _ => {}
        }
    }

    let profile = UserService::register(state.db(), state.media(), input).await?;
    info!(username = %profile.username, "User registered");

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Login with username or email plus password
///
/// POST /api/v1/users/login
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let response = UserService::login(
        state.db(),
        state.jwt(),
        req.username.as_deref(),
        req.email.as_deref(),
        &req.password,
    )
    .await?;

    let jar = set_session_cookies(jar, &response.tokens);
    Ok((jar, Json(response)))
}

/// Log out the current session
///
/// POST /api/v1/users/logout
///
/// Idempotent: a repeated logout clears an already-null refresh token.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    user: CurrentUser,
) -> ApiResult<(CookieJar, Json<Value>)> {
    UserService::logout(state.db(), user.id()).await?;

    let jar = clear_session_cookies(jar);
    Ok((jar, Json(json!({ "status": "ok" }))))
}

/// Rotate the session's token pair
///
/// POST /api/v1/users/refresh-token
///
/// The refresh token is read from the `refreshToken` cookie or, failing
/// that, the request body.
async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> ApiResult<(CookieJar, Json<AuthTokens>)> {
    let token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| body.and_then(|Json(req)| req.refresh_token))
        .ok_or_else(|| ApiError::BadRequest("Refresh token not provided".to_string()))?;

    let tokens = UserService::refresh(state.db(), state.jwt(), &token).await?;

    let jar = set_session_cookies(jar, &tokens);
    Ok((jar, Json(tokens)))
}

/// Change the caller's password
///
/// PATCH /api/v1/users/change-password
///
/// Revokes the active session; the cookies are cleared and the caller
/// must log in again.
async fn change_password(
    State(state): State<AppState>,
    jar: CookieJar,
    user: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<(CookieJar, Json<Value>)> {
    UserService::change_password(state.db(), user.id(), &req.old_password, &req.new_password)
        .await?;

    let jar = clear_session_cookies(jar);
    Ok((jar, Json(json!({ "status": "password changed" }))))
}

/// Get the caller's profile
///
/// GET /api/v1/users/current-user
async fn current_user(user: CurrentUser) -> Json<UserProfile> {
    Json(user.user.into())
}

/// Update full name and email
///
/// PATCH /api/v1/users/update-details
async fn update_details(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdateDetailsRequest>,
) -> ApiResult<Json<UserProfile>> {
    if req.full_name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(ApiError::Validation("All fields are required".to_string()));
    }

    let updated =
        UserRepository::update_details(state.db(), user.id(), req.full_name.trim(), req.email.trim())
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Replace the caller's avatar
///
/// PATCH /api/v1/users/update-avatar (multipart: avatar file)
async fn update_avatar(
    State(state): State<AppState>,
    user: CurrentUser,
    multipart: Multipart,
) -> ApiResult<Json<UserProfile>> {
    let file = read_single_file(multipart, "avatar").await?;
    let url = state
        .media()
        .store(&file.file_name, &file.bytes)
        .await
        .map_err(ApiError::Internal)?;

    let updated = UserRepository::update_avatar(state.db(), user.id(), &url)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Old file is unreferenced now; removal is best-effort
    state.media().delete(&user.user.avatar_url).await;

    Ok(Json(updated.into()))
}

/// Replace the caller's cover image
///
/// PATCH /api/v1/users/update-cover-image (multipart: cover_image file)
async fn update_cover_image(
    State(state): State<AppState>,
    user: CurrentUser,
    multipart: Multipart,
) -> ApiResult<Json<UserProfile>> {
    let file = read_single_file(multipart, "cover_image").await?;
    let url = state
        .media()
        .store(&file.file_name, &file.bytes)
        .await
        .map_err(ApiError::Internal)?;

    let updated = UserRepository::update_cover_image(state.db(), user.id(), &url)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if let Some(old) = &user.user.cover_image_url {
        state.media().delete(old).await;
    }

    Ok(Json(updated.into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart field: {}", e)))
}

async fn read_file(
    field: axum::extract::multipart::Field<'_>,
    fallback_name: &str,
) -> ApiResult<UploadedFile> {
    let file_name = field
        .file_name()
        .unwrap_or(fallback_name)
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart field: {}", e)))?;

    Ok(UploadedFile {
        file_name,
        bytes: bytes.to_vec(),
    })
}

/// Pull exactly one named file out of a multipart form
async fn read_single_file(mut multipart: Multipart, name: &str) -> ApiResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart form: {}", e)))?
    {
        if field.name() == Some(name) {
            return read_file(field, name).await;
        }
    }

    Err(ApiError::BadRequest(format!("Missing file field: {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie(ACCESS_TOKEN_COOKIE, "token".to_string());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_removal_cookie_has_path() {
        let cookie = removal_cookie(REFRESH_TOKEN_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
    }
}

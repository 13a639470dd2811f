//! Tweet routes
//!
//! Short text posts attached to a channel. Updates and deletes are
//! owner-only.

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{TweetRepository, UserRepository};
use crate::state::AppState;
use crate::types::{PaginatedResponse, Pagination, TweetContentRequest, TweetResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

/// Create tweet routes
pub fn tweet_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tweet))
        .route("/user/:username", get(list_user_tweets))
        .route("/:id", patch(update_tweet).delete(delete_tweet))
}

/// POST /api/v1/tweets - create a tweet
async fn create_tweet(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<TweetContentRequest>,
) -> ApiResult<(StatusCode, Json<TweetResponse>)> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Content is required".to_string()));
    }

    let tweet = TweetRepository::create(state.db(), user.id(), content)
        .await
        .map_err(ApiError::Internal)?;

    Ok((StatusCode::CREATED, Json(tweet.into())))
}

/// GET /api/v1/tweets/user/:username - a channel's tweets, newest first
async fn list_user_tweets(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(username): Path<String>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<PaginatedResponse<TweetResponse>>> {
    let channel = UserRepository::find_public_by_username(state.db(), username.trim())
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let (tweets, total) = TweetRepository::list_by_owner(
        state.db(),
        channel.id,
        pagination.limit(),
        pagination.offset(),
    )
    .await
    .map_err(ApiError::Internal)?;

    let items = tweets.into_iter().map(TweetResponse::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, &pagination)))
}

/// PATCH /api/v1/tweets/:id - update a tweet (owner only)
async fn update_tweet(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<TweetContentRequest>,
) -> ApiResult<Json<TweetResponse>> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Content is required".to_string()));
    }

    let tweet = TweetRepository::find_by_id(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Tweet not found".to_string()))?;

    if tweet.owner_id != user.id() {
        return Err(ApiError::Forbidden(
            "Only the tweet owner can update it".to_string(),
        ));
    }

    let updated = TweetRepository::update_content(state.db(), id, content)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(updated.into()))
}

/// DELETE /api/v1/tweets/:id - delete a tweet (owner only)
async fn delete_tweet(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let tweet = TweetRepository::find_by_id(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Tweet not found".to_string()))?;

    if tweet.owner_id != user.id() {
        return Err(ApiError::Forbidden(
            "Only the tweet owner can delete it".to_string(),
        ));
    }

    TweetRepository::delete(state.db(), id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(StatusCode::NO_CONTENT)
}

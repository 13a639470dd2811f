//! Like routes
//!
//! Likes toggle: the first call likes the target, the second removes the
//! like. The target must exist.

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{
    CommentRepository, LikeRepository, LikeTarget, TweetRepository, VideoRepository,
};
use crate::state::AppState;
use crate::types::{LikeToggleResponse, PaginatedResponse, Pagination, VideoListItem};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

/// Create like routes
pub fn like_routes() -> Router<AppState> {
    Router::new()
        .route("/video/:id", post(toggle_video_like))
        .route("/comment/:id", post(toggle_comment_like))
        .route("/tweet/:id", post(toggle_tweet_like))
        .route("/videos", get(liked_videos))
}

/// POST /api/v1/likes/video/:id - toggle a video like
async fn toggle_video_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LikeToggleResponse>> {
    if !VideoRepository::exists(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
    {
        return Err(ApiError::NotFound("Video not found".to_string()));
    }

    let liked = LikeRepository::toggle(state.db(), user.id(), LikeTarget::Video(id))
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(LikeToggleResponse { liked }))
}

/// POST /api/v1/likes/comment/:id - toggle a comment like
async fn toggle_comment_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LikeToggleResponse>> {
    if !CommentRepository::exists(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
    {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    let liked = LikeRepository::toggle(state.db(), user.id(), LikeTarget::Comment(id))
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(LikeToggleResponse { liked }))
}

/// POST /api/v1/likes/tweet/:id - toggle a tweet like
async fn toggle_tweet_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LikeToggleResponse>> {
    if !TweetRepository::exists(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
    {
        return Err(ApiError::NotFound("Tweet not found".to_string()));
    }

    let liked = LikeRepository::toggle(state.db(), user.id(), LikeTarget::Tweet(id))
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(LikeToggleResponse { liked }))
}

/// GET /api/v1/likes/videos - the caller's liked videos
async fn liked_videos(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<PaginatedResponse<VideoListItem>>> {
    let (videos, total) = LikeRepository::list_liked_videos(
        state.db(),
        user.id(),
        pagination.limit(),
        pagination.offset(),
    )
    .await
    .map_err(ApiError::Internal)?;

    let items = videos.into_iter().map(VideoListItem::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, &pagination)))
}

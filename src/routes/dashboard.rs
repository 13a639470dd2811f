//! Channel dashboard routes
//!
//! Aggregate stats and the full video list (published and not) for the
//! caller's own channel.

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{
    LikeRepository, SubscriptionRepository, VideoRepository, VideoSort,
};
use crate::state::AppState;
use crate::types::{ChannelStats, PaginatedResponse, Pagination, VideoListItem};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

/// Create dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(channel_stats))
        .route("/videos", get(channel_videos))
}

/// GET /api/v1/dashboard/stats - aggregate stats for the caller's channel
async fn channel_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ChannelStats>> {
    let (total_videos, total_views) = VideoRepository::channel_totals(state.db(), user.id())
        .await
        .map_err(ApiError::Internal)?;
    let total_subscribers = SubscriptionRepository::count_subscribers(state.db(), user.id())
        .await
        .map_err(ApiError::Internal)?;
    let total_likes = LikeRepository::count_channel_video_likes(state.db(), user.id())
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(ChannelStats {
        total_videos,
        total_views,
        total_subscribers,
        total_likes,
    }))
}

/// GET /api/v1/dashboard/videos - every video on the caller's channel,
/// unpublished included
async fn channel_videos(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<PaginatedResponse<VideoListItem>>> {
    let (videos, total) = VideoRepository::list_by_owner(
        state.db(),
        user.id(),
        true,
        None,
        VideoSort::default(),
        true,
        pagination.limit(),
        pagination.offset(),
    )
    .await
    .map_err(ApiError::Internal)?;

    let items = videos.into_iter().map(VideoListItem::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, &pagination)))
}

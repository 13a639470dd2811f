//! Video routes
//!
//! Publishing is a multipart upload (video file + thumbnail); listings are
//! per-channel with title search, sorting and pagination. Unpublished
//! videos are visible to their owner only.

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{NewVideo, UserRepository, VideoRepository, VideoSort};
use crate::services::UploadedFile;
use crate::state::AppState;
use crate::types::{PaginatedResponse, VideoListItem, VideoListQuery, VideoResponse};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

/// Create video routes
///
/// Comment listing/creation lives under the video it belongs to.
pub fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(publish_video))
        .route("/:id", get(get_video))
        .nest("/:id/comments", super::comments::video_comment_routes())
}

/// List a channel's videos
///
/// GET /api/v1/videos?username=...&query=...&sort_by=...&sort_type=...
async fn list_videos(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<VideoListQuery>,
) -> ApiResult<Json<PaginatedResponse<VideoListItem>>> {
    let channel = UserRepository::find_public_by_username(state.db(), params.username.trim())
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let sort = match params.sort_by.as_deref() {
        Some(s) => VideoSort::parse(s)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown sort key: {}", s)))?,
        None => VideoSort::default(),
    };
    let descending = !matches!(params.sort_type.as_deref(), Some("asc"));

    let pagination = params.pagination();
    let include_unpublished = channel.id == user.id();
    let (videos, total) = VideoRepository::list_by_owner(
        state.db(),
        channel.id,
        include_unpublished,
        params.query.as_deref().filter(|q| !q.trim().is_empty()),
        sort,
        descending,
        pagination.limit(),
        pagination.offset(),
    )
    .await
    .map_err(ApiError::Internal)?;

    let items = videos.into_iter().map(VideoListItem::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, &pagination)))
}

/// Publish a new video
///
/// POST /api/v1/videos (multipart: title, description, duration_secs,
/// video file, thumbnail file)
async fn publish_video(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<VideoResponse>)> {
    let mut title = String::new();
    let mut description = String::new();
    let mut duration_secs = 0.0;
    let mut video: Option<UploadedFile> = None;
    let mut thumbnail: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart form: {}", e)))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "title" => title = read_text(field).await?,
            "description" => description = read_text(field).await?,
            "duration_secs" => {
                duration_secs = read_text(field)
                    .await?
                    .trim()
                    .parse()
                    .map_err(|_| ApiError::BadRequest("Invalid duration".to_string()))?
            }
            "video" => video = Some(read_file(field, "video").await?),
            "thumbnail" => thumbnail = Some(read_file(field, "thumbnail").await?),
            _ => {}
        }
    }

    if title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }
    let Some(video) = video else {
        return Err(ApiError::Validation("Video file is required".to_string()));
    };
    let Some(thumbnail) = thumbnail else {
        return Err(ApiError::Validation("Thumbnail is required".to_string()));
    };

    let video_url = state
        .media()
        .store(&video.file_name, &video.bytes)
        .await
        .map_err(ApiError::Internal)?;
    let thumbnail_url = state
        .media()
        .store(&thumbnail.file_name, &thumbnail.bytes)
        .await
        .map_err(ApiError::Internal)?;

    let record = VideoRepository::create(
        state.db(),
        NewVideo {
            owner_id: user.id(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            video_url,
            thumbnail_url,
            duration_secs,
        },
    )
    .await
    .map_err(ApiError::Internal)?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Get a video by ID
///
/// GET /api/v1/videos/:id
///
/// Counts a view for everyone but the owner.
async fn get_video(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<VideoResponse>> {
    let video = VideoRepository::find_by_id(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

    if !video.is_published && video.owner_id != user.id() {
        return Err(ApiError::NotFound("Video not found".to_string()));
    }

    if video.owner_id != user.id() {
        VideoRepository::increment_views(state.db(), id)
            .await
            .map_err(ApiError::Internal)?;
    }

    Ok(Json(video.into()))
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
    let file_name = field.file_name().unwrap_or(fallback_name).to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart field: {}", e)))?;

    Ok(UploadedFile {
        file_name,
        bytes: bytes.to_vec(),
    })
}

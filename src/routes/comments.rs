//! Comment routes
//!
//! Comments are listed and created under their video; updates and deletes
//! address the comment directly and are owner-only.

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{CommentRepository, VideoRepository};
use crate::state::AppState;
use crate::types::{
    CommentContentRequest, CommentListItem, CommentResponse, PaginatedResponse, Pagination,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

/// Routes nested under /videos/:id/comments
pub fn video_comment_routes() -> Router<AppState> {
    Router::new().route("/", get(list_comments).post(add_comment))
}

/// Routes addressing a comment directly
pub fn comment_routes() -> Router<AppState> {
    Router::new().route("/:id", patch(update_comment).delete(delete_comment))
}

/// GET /api/v1/videos/:id/comments - list a video's comments
async fn list_comments(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(video_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<PaginatedResponse<CommentListItem>>> {
    if !VideoRepository::exists(state.db(), video_id)
        .await
        .map_err(ApiError::Internal)?
    {
        return Err(ApiError::NotFound("Video not found".to_string()));
    }

    let (comments, total) = CommentRepository::list_by_video(
        state.db(),
        video_id,
        pagination.limit(),
        pagination.offset(),
    )
    .await
    .map_err(ApiError::Internal)?;

    let items = comments.into_iter().map(CommentListItem::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, &pagination)))
}

/// POST /api/v1/videos/:id/comments - add a comment
async fn add_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(video_id): Path<Uuid>,
    Json(req): Json<CommentContentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Content is required".to_string()));
    }

    if !VideoRepository::exists(state.db(), video_id)
        .await
        .map_err(ApiError::Internal)?
    {
        return Err(ApiError::NotFound("Video not found".to_string()));
    }

    let comment = CommentRepository::create(state.db(), video_id, user.id(), content)
        .await
        .map_err(ApiError::Internal)?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// PATCH /api/v1/comments/:id - update a comment (owner only)
async fn update_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentContentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Content is required".to_string()));
    }

    let comment = CommentRepository::find_by_id(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    if comment.owner_id != user.id() {
        return Err(ApiError::Forbidden(
            "Only the comment owner can update it".to_string(),
        ));
    }

    let updated = CommentRepository::update_content(state.db(), id, content)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(updated.into()))
}

/// DELETE /api/v1/comments/:id - delete a comment (owner only)
async fn delete_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let comment = CommentRepository::find_by_id(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    if comment.owner_id != user.id() {
        return Err(ApiError::Forbidden(
            "Only the comment owner can delete it".to_string(),
        ));
    }

    CommentRepository::delete(state.db(), id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(StatusCode::NO_CONTENT)
}

//! Playlist routes
//!
//! Playlists are owned collections of videos. Names are unique per owner;
//! all mutations are owner-only. Video order within a playlist follows
//! insertion order.

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{PlaylistRecord, PlaylistRepository, VideoRepository};
use crate::state::AppState;
use crate::types::{
    CreatePlaylistRequest, PlaylistResponse, UpdatePlaylistRequest, VideoListItem,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

/// Create playlist routes
pub fn playlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_playlist))
        .route("/user/:user_id", get(list_user_playlists))
        .route(
            "/:id",
            get(get_playlist).patch(update_playlist).delete(delete_playlist),
        )
        .route(
            "/:id/videos/:video_id",
            post(add_video).delete(remove_video),
        )
}

/// POST /api/v1/playlists - create a playlist
async fn create_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> ApiResult<(StatusCode, Json<PlaylistResponse>)> {
    let name = req.name.trim();
    let description = req.description.trim();
    if name.is_empty() || description.is_empty() {
        return Err(ApiError::Validation(
            "Name and description are required".to_string(),
        ));
    }

    if PlaylistRepository::name_exists(state.db(), user.id(), name)
        .await
        .map_err(ApiError::Internal)?
    {
        return Err(ApiError::Conflict(
            "A playlist with this name already exists".to_string(),
        ));
    }

    let playlist = PlaylistRepository::create(state.db(), user.id(), name, description)
        .await
        .map_err(ApiError::Internal)?;

    Ok((StatusCode::CREATED, Json(playlist.into())))
}

/// GET /api/v1/playlists/user/:user_id - a user's playlists
async fn list_user_playlists(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<PlaylistResponse>>> {
    let playlists = PlaylistRepository::list_by_owner(state.db(), user_id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(
        playlists.into_iter().map(PlaylistResponse::from).collect(),
    ))
}

/// GET /api/v1/playlists/:id - a playlist with its videos
async fn get_playlist(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PlaylistResponse>> {
    let playlist = find_playlist(&state, id).await?;

    let videos = PlaylistRepository::list_videos(state.db(), id)
        .await
        .map_err(ApiError::Internal)?;

    let mut response = PlaylistResponse::from(playlist);
    response.videos = Some(videos.into_iter().map(VideoListItem::from).collect());
    Ok(Json(response))
}

/// PATCH /api/v1/playlists/:id - rename or re-describe (owner only)
async fn update_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlaylistRequest>,
) -> ApiResult<Json<PlaylistResponse>> {
    let playlist = find_playlist(&state, id).await?;
    require_owner(&playlist, user.id())?;

    let name = req.name.as_deref().map(str::trim);
    let description = req.description.as_deref().map(str::trim);
    if matches!(name, Some("")) || matches!(description, Some("")) {
        return Err(ApiError::Validation("Fields cannot be empty".to_string()));
    }

    if let Some(new_name) = name {
        if new_name != playlist.name
            && PlaylistRepository::name_exists(state.db(), user.id(), new_name)
                .await
                .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict(
                "A playlist with this name already exists".to_string(),
            ));
        }
    }

    let updated = PlaylistRepository::update(state.db(), id, name, description)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(updated.into()))
}

/// DELETE /api/v1/playlists/:id - delete a playlist (owner only)
async fn delete_playlist(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let playlist = find_playlist(&state, id).await?;
    require_owner(&playlist, user.id())?;

    PlaylistRepository::delete(state.db(), id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/playlists/:id/videos/:video_id - append a video (owner only)
async fn add_video(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, video_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<PlaylistResponse>> {
    let playlist = find_playlist(&state, id).await?;
    require_owner(&playlist, user.id())?;

    if !VideoRepository::exists(state.db(), video_id)
        .await
        .map_err(ApiError::Internal)?
    {
        return Err(ApiError::NotFound("Video not found".to_string()));
    }

    PlaylistRepository::add_video(state.db(), id, video_id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(playlist.into()))
}

/// DELETE /api/v1/playlists/:id/videos/:video_id - remove a video (owner only)
async fn remove_video(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, video_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<PlaylistResponse>> {
    let playlist = find_playlist(&state, id).await?;
    require_owner(&playlist, user.id())?;

    PlaylistRepository::remove_video(state.db(), id, video_id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(playlist.into()))
}

async fn find_playlist(state: &AppState, id: Uuid) -> ApiResult<PlaylistRecord> {
    PlaylistRepository::find_by_id(state.db(), id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_string()))
}

fn require_owner(playlist: &PlaylistRecord, user_id: Uuid) -> ApiResult<()> {
    if playlist.owner_id != user_id {
        return Err(ApiError::Forbidden(
            "Only the playlist owner can modify it".to_string(),
        ));
    }
    Ok(())
}

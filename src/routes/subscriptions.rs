//! Subscription routes
//!
//! Subscribing toggles like likes do. A channel's subscriber list is
//! visible to the channel owner only.

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::repositories::{SubscriptionRepository, UserRepository};
use crate::state::AppState;
use crate::types::{ChannelListItem, SubscriptionToggleResponse};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

/// Create subscription routes
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/subscribed", get(subscribed_channels))
        .route("/:channel_id", post(toggle_subscription))
        .route("/:channel_id/subscribers", get(list_subscribers))
}

/// POST /api/v1/subscriptions/:channel_id - toggle a subscription
async fn toggle_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(channel_id): Path<Uuid>,
) -> ApiResult<Json<SubscriptionToggleResponse>> {
    if channel_id == user.id() {
        return Err(ApiError::BadRequest(
            "Cannot subscribe to your own channel".to_string(),
        ));
    }

    if !UserRepository::exists(state.db(), channel_id)
        .await
        .map_err(ApiError::Internal)?
    {
        return Err(ApiError::NotFound("Channel not found".to_string()));
    }

    let subscribed = SubscriptionRepository::toggle(state.db(), user.id(), channel_id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(SubscriptionToggleResponse { subscribed }))
}

/// GET /api/v1/subscriptions/:channel_id/subscribers - a channel's
/// subscribers (owner only)
async fn list_subscribers(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(channel_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ChannelListItem>>> {
    if channel_id != user.id() {
        return Err(ApiError::Forbidden(
            "Only the channel owner can list subscribers".to_string(),
        ));
    }

    let subscribers = SubscriptionRepository::list_subscribers(state.db(), channel_id)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(
        subscribers.into_iter().map(ChannelListItem::from).collect(),
    ))
}

/// GET /api/v1/subscriptions/subscribed - channels the caller follows
async fn subscribed_channels(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<ChannelListItem>>> {
    let channels = SubscriptionRepository::list_subscribed_channels(state.db(), user.id())
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(
        channels.into_iter().map(ChannelListItem::from).collect(),
    ))
}

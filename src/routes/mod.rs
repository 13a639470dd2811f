//! Route definitions for the VidStream API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod comments;
mod dashboard;
mod health;
mod likes;
mod playlists;
mod subscriptions;
mod tweets;
mod users;
mod videos;

#[cfg(test)]
mod auth_tests;

pub use comments::comment_routes;
pub use dashboard::dashboard_routes;
pub use likes::like_routes;
pub use playlists::playlist_routes;
pub use subscriptions::subscription_routes;
pub use tweets::tweet_routes;
pub use users::user_routes;
pub use videos::video_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "VidStream API v1" }))
        .nest("/users", user_routes())
        .nest("/videos", video_routes())
        .nest("/comments", comment_routes())
        .nest("/likes", like_routes())
        .nest("/subscriptions", subscription_routes())
        .nest("/playlists", playlist_routes())
        .nest("/tweets", tweet_routes())
        .nest("/dashboard", dashboard_routes())
}

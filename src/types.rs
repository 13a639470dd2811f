//! API request and response types

use crate::repositories::{
    ChannelProfile, CommentRecord, CommentWithOwner, PlaylistRecord, PublicUserRecord,
    TweetRecord, VideoRecord, VideoWithOwner,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page.clamp(1, 100))
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * self.limit()
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, pagination: &Pagination) -> Self {
        let per_page = pagination.limit();
        Self {
            data,
            total,
            page: pagination.page.max(1),
            per_page: per_page as u32,
            total_pages: (total + per_page - 1) / per_page,
        }
    }
}

/// User profile as returned to clients; never carries credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PublicUserRecord> for UserProfile {
    fn from(user: PublicUserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            cover_image_url: user.cover_image_url,
            created_at: user.created_at,
        }
    }
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request: username or email plus password
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub tokens: AuthTokens,
}

/// Refresh request body; the token may instead come from the cookie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Password change request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Account details update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDetailsRequest {
    pub full_name: String,
    pub email: String,
}

/// Summary of a video's owner embedded in listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
}

/// Video as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_secs: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl From<VideoRecord> for VideoResponse {
    fn from(v: VideoRecord) -> Self {
        Self {
            id: v.id,
            owner_id: v.owner_id,
            title: v.title,
            description: v.description,
            video_url: v.video_url,
            thumbnail_url: v.thumbnail_url,
            duration_secs: v.duration_secs,
            views: v.views,
            is_published: v.is_published,
            created_at: v.created_at,
        }
    }
}

/// Video list item with its owner's summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoListItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration_secs: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub owner: OwnerSummary,
}

impl From<VideoWithOwner> for VideoListItem {
    fn from(v: VideoWithOwner) -> Self {
        Self {
            id: v.id,
            title: v.title,
            description: v.description,
            video_url: v.video_url,
            thumbnail_url: v.thumbnail_url,
            duration_secs: v.duration_secs,
            views: v.views,
            is_published: v.is_published,
            created_at: v.created_at,
            owner: OwnerSummary {
                id: v.owner_id,
                username: v.owner_username,
                full_name: v.owner_full_name,
                avatar_url: v.owner_avatar_url,
            },
        }
    }
}

/// Channel video listing query
///
/// Pagination fields are inlined rather than flattened; query-string
/// deserialization cannot see through `#[serde(flatten)]` for numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListQuery {
    pub username: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_type: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl VideoListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Comment create/update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentContentRequest {
    pub content: String,
}

/// Comment as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRecord> for CommentResponse {
    fn from(c: CommentRecord) -> Self {
        Self {
            id: c.id,
            video_id: c.video_id,
            owner_id: c.owner_id,
            content: c.content,
            created_at: c.created_at,
        }
    }
}

/// Comment list item with its author's summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentListItem {
    pub id: Uuid,
    pub video_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner: OwnerSummary,
}

impl From<CommentWithOwner> for CommentListItem {
    fn from(c: CommentWithOwner) -> Self {
        Self {
            id: c.id,
            video_id: c.video_id,
            content: c.content,
            created_at: c.created_at,
            owner: OwnerSummary {
                id: c.owner_id,
                username: c.owner_username,
                full_name: c.owner_full_name,
                avatar_url: c.owner_avatar_url,
            },
        }
    }
}

/// Result of toggling a like
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeToggleResponse {
    pub liked: bool,
}

/// Result of toggling a subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionToggleResponse {
    pub subscribed: bool,
}

/// Subscriber / subscribed-channel list item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelListItem {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    pub subscribed_at: DateTime<Utc>,
}

impl From<ChannelProfile> for ChannelListItem {
    fn from(c: ChannelProfile) -> Self {
        Self {
            id: c.id,
            username: c.username,
            full_name: c.full_name,
            avatar_url: c.avatar_url,
            subscribed_at: c.subscribed_at,
        }
    }
}

/// Playlist create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
}

/// Playlist update request (unset fields keep their value)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlaylistRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Playlist as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoListItem>>,
}

impl From<PlaylistRecord> for PlaylistResponse {
    fn from(p: PlaylistRecord) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
            videos: None,
        }
    }
}

/// Tweet create/update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetContentRequest {
    pub content: String,
}

/// Tweet as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<TweetRecord> for TweetResponse {
    fn from(t: TweetRecord) -> Self {
        Self {
            id: t.id,
            owner_id: t.owner_id,
            content: t.content,
            created_at: t.created_at,
        }
    }
}

/// Channel dashboard statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_subscribers: i64,
    pub total_likes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_offset() {
        let p = Pagination {
            page: 3,
            per_page: 20,
        };
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_pagination_clamps_per_page() {
        let p = Pagination {
            page: 1,
            per_page: 10_000,
        };
        assert_eq!(p.limit(), 100);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = Pagination {
            page: 1,
            per_page: 10,
        };
        let resp = PaginatedResponse::new(Vec::<u8>::new(), 21, &p);
        assert_eq!(resp.total_pages, 3);
    }
}

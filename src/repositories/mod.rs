//! Database repositories
//!
//! Provides the data access layer for database operations.

pub mod comment;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::{CommentRecord, CommentRepository, CommentWithOwner};
pub use like::{LikeRepository, LikeTarget};
pub use playlist::{PlaylistRecord, PlaylistRepository};
pub use subscription::{ChannelProfile, SubscriptionRepository};
pub use tweet::{TweetRecord, TweetRepository};
pub use user::{NewUser, PublicUserRecord, UserRecord, UserRepository};
pub use video::{NewVideo, VideoRecord, VideoRepository, VideoSort, VideoWithOwner};

//! Integration tests for videos, comments, likes, subscriptions,
//! playlists, tweets and the channel dashboard

mod common;

use axum::http::StatusCode;
use common::MultipartBody;
use serde_json::json;

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

async fn publish_video(
    app: &common::TestApp,
    token: &str,
    title: &str,
) -> serde_json::Value {
    let body = MultipartBody::new()
        .text("title", title)
        .text("description", "A test video")
        .text("duration_secs", "12.5")
        .file("video", "clip.mp4", b"fake-mp4-bytes")
        .file("thumbnail", "thumb.png", b"fake-png-bytes")
        .finish();

    let (status, response) = app
        .post_multipart_auth("/api/v1/videos", token, MultipartBody::BOUNDARY, body)
        .await;
    assert_eq!(status, StatusCode::CREATED, "video publish failed");

    serde_json::from_str(&response).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_publish_and_get_video() {
    let app = common::TestApp::new().await;
    let username = unique("vid");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    let video = publish_video(&app, &token, "My first video").await;
    let video_id = video["id"].as_str().unwrap();
    assert_eq!(video["title"], "My first video");

    let (status, response) = app
        .get_auth(&format!("/api/v1/videos/{}", video_id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let fetched: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(fetched["id"], video["id"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_publish_requires_title() {
    let app = common::TestApp::new().await;
    let username = unique("notitle");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    let body = MultipartBody::new()
        .text("description", "missing title")
        .text("duration_secs", "5")
        .file("video", "clip.mp4", b"fake-mp4-bytes")
        .file("thumbnail", "thumb.png", b"fake-png-bytes")
        .finish();

    let (status, _) = app
        .post_multipart_auth("/api/v1/videos", &token, MultipartBody::BOUNDARY, body)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_channel_videos() {
    let app = common::TestApp::new().await;
    let username = unique("list");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    publish_video(&app, &token, "Video one").await;
    publish_video(&app, &token, "Video two").await;

    let (status, response) = app
        .get_auth(&format!("/api/v1/videos?username={}", username), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let page: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(page["total"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_videos_unknown_sort_key() {
    let app = common::TestApp::new().await;
    let username = unique("badsort");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    let (status, _) = app
        .get_auth(
            &format!("/api/v1/videos?username={}&sort_by=password_hash", username),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_comment_lifecycle() {
    let app = common::TestApp::new().await;
    let owner = unique("cowner");
    let (owner_token, _) = app
        .login_user(&owner, &format!("{}@example.com", owner), "Password123!")
        .await;
    let other = unique("cother");
    let (other_token, _) = app
        .login_user(&other, &format!("{}@example.com", other), "Password123!")
        .await;

    let video = publish_video(&app, &owner_token, "Commented video").await;
    let video_id = video["id"].as_str().unwrap();

    // Add
    let body = json!({ "content": "Nice video" });
    let (status, response) = app
        .post_auth(
            &format!("/api/v1/videos/{}/comments", video_id),
            &other_token,
            &body.to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment: serde_json::Value = serde_json::from_str(&response).unwrap();
    let comment_id = comment["id"].as_str().unwrap();

    // Only the comment owner can edit it
    let body = json!({ "content": "Edited by stranger" });
    let (status, _) = app
        .patch_auth(
            &format!("/api/v1/comments/{}", comment_id),
            &owner_token,
            &body.to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let body = json!({ "content": "Edited by author" });
    let (status, _) = app
        .patch_auth(
            &format!("/api/v1/comments/{}", comment_id),
            &other_token,
            &body.to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Delete
    let (status, _) = app
        .delete_auth(&format!("/api/v1/comments/{}", comment_id), &other_token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_like_toggle() {
    let app = common::TestApp::new().await;
    let username = unique("liker");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    let video = publish_video(&app, &token, "Likable video").await;
    let video_id = video["id"].as_str().unwrap();

    let (status, response) = app
        .post_auth(&format!("/api/v1/likes/video/{}", video_id), &token, "{}")
        .await;
    assert_eq!(status, StatusCode::OK);
    let toggled: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(toggled["liked"], true);

    // Second toggle removes the like
    let (status, response) = app
        .post_auth(&format!("/api/v1/likes/video/{}", video_id), &token, "{}")
        .await;
    assert_eq!(status, StatusCode::OK);
    let toggled: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(toggled["liked"], false);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_like_missing_video() {
    let app = common::TestApp::new().await;
    let username = unique("likeghost");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    let (status, _) = app
        .post_auth(
            &format!("/api/v1/likes/video/{}", uuid::Uuid::new_v4()),
            &token,
            "{}",
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_subscription_toggle() {
    let app = common::TestApp::new().await;
    let channel = unique("channel");
    let (channel_token, _) = app
        .login_user(&channel, &format!("{}@example.com", channel), "Password123!")
        .await;
    let viewer = unique("viewer");
    let (viewer_token, _) = app
        .login_user(&viewer, &format!("{}@example.com", viewer), "Password123!")
        .await;

    let (_, response) = app
        .get_auth("/api/v1/users/current-user", &channel_token)
        .await;
    let channel_profile: serde_json::Value = serde_json::from_str(&response).unwrap();
    let channel_id = channel_profile["id"].as_str().unwrap();

    // Subscribe, then unsubscribe
    let (status, response) = app
        .post_auth(&format!("/api/v1/subscriptions/{}", channel_id), &viewer_token, "{}")
        .await;
    assert_eq!(status, StatusCode::OK);
    let toggled: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(toggled["subscribed"], true);

    // Only the channel owner may list subscribers
    let (status, _) = app
        .get_auth(
            &format!("/api/v1/subscriptions/{}/subscribers", channel_id),
            &viewer_token,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, response) = app
        .get_auth(
            &format!("/api/v1/subscriptions/{}/subscribers", channel_id),
            &channel_token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let subscribers: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(subscribers.as_array().unwrap().len(), 1);

    let (status, response) = app
        .post_auth(&format!("/api/v1/subscriptions/{}", channel_id), &viewer_token, "{}")
        .await;
    assert_eq!(status, StatusCode::OK);
    let toggled: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(toggled["subscribed"], false);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_cannot_subscribe_to_self() {
    let app = common::TestApp::new().await;
    let username = unique("selfsub");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    let (_, response) = app.get_auth("/api/v1/users/current-user", &token).await;
    let profile: serde_json::Value = serde_json::from_str(&response).unwrap();

    let (status, _) = app
        .post_auth(
            &format!("/api/v1/subscriptions/{}", profile["id"].as_str().unwrap()),
            &token,
            "{}",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_playlist_lifecycle() {
    let app = common::TestApp::new().await;
    let username = unique("plist");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    let body = json!({ "name": "Favorites", "description": "Best of" });
    let (status, response) = app
        .post_auth("/api/v1/playlists", &token, &body.to_string())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let playlist: serde_json::Value = serde_json::from_str(&response).unwrap();
    let playlist_id = playlist["id"].as_str().unwrap();

    // Duplicate name for the same owner conflicts
    let (status, _) = app
        .post_auth("/api/v1/playlists", &token, &body.to_string())
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Add a video and read it back in order
    let video = publish_video(&app, &token, "Playlist video").await;
    let video_id = video["id"].as_str().unwrap();

    let (status, _) = app
        .post_auth(
            &format!("/api/v1/playlists/{}/videos/{}", playlist_id, video_id),
            &token,
            "{}",
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = app
        .get_auth(&format!("/api/v1/playlists/{}", playlist_id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let fetched: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(fetched["videos"].as_array().unwrap().len(), 1);

    // Remove and delete
    let (status, _) = app
        .delete_auth(
            &format!("/api/v1/playlists/{}/videos/{}", playlist_id, video_id),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .delete_auth(&format!("/api/v1/playlists/{}", playlist_id), &token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_tweet_lifecycle() {
    let app = common::TestApp::new().await;
    let username = unique("tweeter");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    let body = json!({ "content": "Hello world" });
    let (status, response) = app
        .post_auth("/api/v1/tweets", &token, &body.to_string())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let tweet: serde_json::Value = serde_json::from_str(&response).unwrap();
    let tweet_id = tweet["id"].as_str().unwrap();

    let (status, response) = app
        .get_auth(&format!("/api/v1/tweets/user/{}", username), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let page: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(page["total"], 1);

    let (status, _) = app
        .delete_auth(&format!("/api/v1/tweets/{}", tweet_id), &token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_dashboard_stats() {
    let app = common::TestApp::new().await;
    let username = unique("dash");
    let (token, _) = app
        .login_user(&username, &format!("{}@example.com", username), "Password123!")
        .await;

    publish_video(&app, &token, "Dashboard video").await;

    let (status, response) = app.get_auth("/api/v1/dashboard/stats", &token).await;
    assert_eq!(status, StatusCode::OK);

    let stats: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(stats["total_videos"], 1);
    assert_eq!(stats["total_subscribers"], 0);
    assert_eq!(stats["total_likes"], 0);
}

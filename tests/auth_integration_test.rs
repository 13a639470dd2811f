//! Integration tests for registration, login and session lifecycle

mod common;

use axum::http::StatusCode;
use common::MultipartBody;
use serde_json::json;

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_success() {
    let app = common::TestApp::new().await;

    let username = unique("register");
    let body = MultipartBody::new()
        .text("username", &username)
        .text("email", &format!("{}@example.com", username))
        .text("full_name", "Register Test")
        .text("password", "SecurePassword123!")
        .file("avatar", "avatar.png", b"fake-png-bytes")
        .finish();

    let (status, response) = app
        .post_multipart("/api/v1/users/register", MultipartBody::BOUNDARY, body)
        .await;

    assert_eq!(status, StatusCode::CREATED);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["username"], username);
    assert!(!response["avatar_url"].as_str().unwrap().is_empty());
    // The stored password and refresh token must never appear in responses
    assert!(response.get("password").is_none());
    assert!(response.get("password_hash").is_none());
    assert!(response.get("refresh_token").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_duplicate_username() {
    let app = common::TestApp::new().await;

    let username = unique("duplicate");
    app.register_user(
        &username,
        &format!("{}@example.com", username),
        "SecurePassword123!",
    )
    .await;

    // Same username, different email
    let body = MultipartBody::new()
        .text("username", &username)
        .text("email", &format!("other_{}@example.com", username))
        .text("full_name", "Duplicate Test")
        .text("password", "SecurePassword123!")
        .file("avatar", "avatar.png", b"fake-png-bytes")
        .finish();

    let (status, _) = app
        .post_multipart("/api/v1/users/register", MultipartBody::BOUNDARY, body)
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_short_password_accepted() {
    let app = common::TestApp::new().await;

    // No password length policy: any non-empty password registers
    let username = unique("alice");
    let body = MultipartBody::new()
        .text("username", &username)
        .text("email", &format!("{}@example.com", username))
        .text("full_name", "Alice Example")
        .text("password", "pw123")
        .file("avatar", "avatar.png", b"fake-png-bytes")
        .finish();

    let (status, _) = app
        .post_multipart("/api/v1/users/register", MultipartBody::BOUNDARY, body)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let login = json!({ "username": username, "password": "pw123" });
    let (status, _) = app.post("/api/v1/users/login", &login.to_string()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_empty_password_rejected() {
    let app = common::TestApp::new().await;

    let username = unique("nopass");
    let body = MultipartBody::new()
        .text("username", &username)
        .text("email", &format!("{}@example.com", username))
        .text("full_name", "No Password")
        .text("password", "")
        .file("avatar", "avatar.png", b"fake-png-bytes")
        .finish();

    let (status, _) = app
        .post_multipart("/api/v1/users/register", MultipartBody::BOUNDARY, body)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_requires_avatar() {
    let app = common::TestApp::new().await;

    let username = unique("noavatar");
    let body = MultipartBody::new()
        .text("username", &username)
        .text("email", &format!("{}@example.com", username))
        .text("full_name", "No Avatar")
        .text("password", "SecurePassword123!")
        .finish();

    let (status, _) = app
        .post_multipart("/api/v1/users/register", MultipartBody::BOUNDARY, body)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_success() {
    let app = common::TestApp::new().await;

    let username = unique("login");
    let email = format!("{}@example.com", username);
    app.register_user(&username, &email, "SecurePassword123!")
        .await;

    let body = json!({ "username": username, "password": "SecurePassword123!" });
    let (status, response) = app.post("/api/v1/users/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert!(!response["tokens"]["access_token"].as_str().unwrap().is_empty());
    assert!(!response["tokens"]["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(response["tokens"]["token_type"], "Bearer");
    assert_eq!(response["user"]["username"], username);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_by_email() {
    let app = common::TestApp::new().await;

    let username = unique("byemail");
    let email = format!("{}@example.com", username);
    app.register_user(&username, &email, "SecurePassword123!")
        .await;

    let body = json!({ "email": email, "password": "SecurePassword123!" });
    let (status, _) = app.post("/api/v1/users/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_wrong_password() {
    let app = common::TestApp::new().await;

    let username = unique("wrongpass");
    app.register_user(
        &username,
        &format!("{}@example.com", username),
        "CorrectPassword123!",
    )
    .await;

    let body = json!({ "username": username, "password": "WrongPassword123!" });
    let (status, response) = app.post("/api/v1/users/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // No tokens on a failed login
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert!(response.get("tokens").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_nonexistent_user() {
    let app = common::TestApp::new().await;

    let body = json!({ "username": unique("ghost"), "password": "SomePassword123!" });
    let (status, _) = app.post("/api/v1/users/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_requires_identifier() {
    let app = common::TestApp::new().await;

    let body = json!({ "password": "SomePassword123!" });
    let (status, _) = app.post("/api/v1/users/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_refresh_rotates_tokens() {
    let app = common::TestApp::new().await;

    let username = unique("rotate");
    let (_, refresh_token) = app
        .login_user(
            &username,
            &format!("{}@example.com", username),
            "SecurePassword123!",
        )
        .await;

    let body = json!({ "refresh_token": refresh_token });
    let (status, response) = app
        .post("/api/v1/users/refresh-token", &body.to_string())
        .await;

    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    let new_refresh = response["refresh_token"].as_str().unwrap();
    assert!(!new_refresh.is_empty());

    // The old refresh token was replaced and must now be rejected
    let body = json!({ "refresh_token": refresh_token });
    let (status, _) = app
        .post("/api/v1/users/refresh-token", &body.to_string())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The new one still works
    let body = json!({ "refresh_token": new_refresh });
    let (status, _) = app
        .post("/api/v1/users/refresh-token", &body.to_string())
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_refresh_token_invalid() {
    let app = common::TestApp::new().await;

    let body = json!({ "refresh_token": "invalid-token" });
    let (status, _) = app
        .post("/api/v1/users/refresh-token", &body.to_string())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_refresh_token_missing() {
    let app = common::TestApp::new().await;

    let (status, _) = app.post("/api/v1/users/refresh-token", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_logout_revokes_refresh_token() {
    let app = common::TestApp::new().await;

    let username = unique("logout");
    let (access_token, refresh_token) = app
        .login_user(
            &username,
            &format!("{}@example.com", username),
            "SecurePassword123!",
        )
        .await;

    let (status, _) = app
        .post_auth("/api/v1/users/logout", &access_token, "{}")
        .await;
    assert_eq!(status, StatusCode::OK);

    // The stored refresh token is gone, so refresh must fail even though
    // the token's signature is still valid
    let body = json!({ "refresh_token": refresh_token });
    let (status, _) = app
        .post("/api/v1/users/refresh-token", &body.to_string())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logout is idempotent
    let (status, _) = app
        .post_auth("/api/v1/users/logout", &access_token, "{}")
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_change_password_revokes_session() {
    let app = common::TestApp::new().await;

    let username = unique("chpass");
    let (access_token, refresh_token) = app
        .login_user(
            &username,
            &format!("{}@example.com", username),
            "OldPassword123!",
        )
        .await;

    let body = json!({ "old_password": "OldPassword123!", "new_password": "NewPassword456!" });
    let (status, _) = app
        .patch_auth("/api/v1/users/change-password", &access_token, &body.to_string())
        .await;
    assert_eq!(status, StatusCode::OK);

    // Changing the password revokes the stored refresh token
    let body = json!({ "refresh_token": refresh_token });
    let (status, _) = app
        .post("/api/v1/users/refresh-token", &body.to_string())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Old password no longer logs in, new one does
    let body = json!({ "username": username, "password": "OldPassword123!" });
    let (status, _) = app.post("/api/v1/users/login", &body.to_string()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = json!({ "username": username, "password": "NewPassword456!" });
    let (status, _) = app.post("/api/v1/users/login", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_change_password_wrong_old_password() {
    let app = common::TestApp::new().await;

    let username = unique("chpassbad");
    let (access_token, _) = app
        .login_user(
            &username,
            &format!("{}@example.com", username),
            "OldPassword123!",
        )
        .await;

    let body = json!({ "old_password": "NotTheOldPassword!", "new_password": "NewPassword456!" });
    let (status, _) = app
        .patch_auth("/api/v1/users/change-password", &access_token, &body.to_string())
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_current_user() {
    let app = common::TestApp::new().await;

    let username = unique("current");
    let (access_token, _) = app
        .login_user(
            &username,
            &format!("{}@example.com", username),
            "SecurePassword123!",
        )
        .await;

    let (status, response) = app
        .get_auth("/api/v1/users/current-user", &access_token)
        .await;

    assert_eq!(status, StatusCode::OK);

    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["username"], username);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_current_user_without_token() {
    let app = common::TestApp::new().await;

    let (status, _) = app.get("/api/v1/users/current-user").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

//! Session middleware
//!
//! Provides an Axum extractor that resolves the acting identity for a
//! request: it validates the access token, loads the user it names and
//! attaches the result to the handler. Expired access tokens are never
//! implicitly refreshed here; refresh is a distinct endpoint.

use crate::error::ApiError;
use crate::repositories::{PublicUserRecord, UserRepository};
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

/// Cookie carrying the access token for browser clients
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie carrying the refresh token for browser clients
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Authenticated user resolved from the access token
///
/// The user is loaded with a projection that excludes the password hash
/// and the stored refresh token, so neither can leak into responses.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: PublicUserRecord,
}

impl CurrentUser {
    #[inline]
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Cookie takes precedence over the Authorization header
        let jar = CookieJar::from_headers(&parts.headers);
        let token = match jar.get(ACCESS_TOKEN_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => bearer_token(parts)
                .ok_or_else(|| ApiError::Unauthenticated("No token provided".to_string()))?,
        };

        let claims = app_state
            .jwt()
            .validate_access_token(&token)
            .map_err(|e| ApiError::Unauthenticated(format!("Invalid token: {}", e)))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthenticated("Invalid user ID in token".to_string()))?;

        // The token may outlive the account it names
        let user = UserRepository::find_public_by_id(app_state.db(), user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthenticated("User not found".to_string()))?;

        Ok(CurrentUser { user })
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let parts = parts_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_missing_header_rejected() {
        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}

//! JWT token generation and validation
//!
//! Access and refresh tokens are signed with distinct secrets and distinct
//! expiry windows. Keys are pre-computed once at startup and cached in
//! AppState.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token type: "access" or "refresh"
    pub token_type: String,
}

/// Pre-computed signing keys for one token family
///
/// Expensive to derive, so they are created once and wrapped in Arc
/// for cheap cloning.
#[derive(Clone)]
struct KeyPair {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl KeyPair {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
///
/// Holds one key pair per token family. Call `new` once at application
/// startup and store in AppState; do NOT create per-request.
#[derive(Clone)]
pub struct JwtService {
    access_keys: KeyPair,
    refresh_keys: KeyPair,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Self {
        Self {
            access_keys: KeyPair::new(access_secret),
            refresh_keys: KeyPair::new(refresh_secret),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
        }
    }

    /// Generate a short-lived access token for a user
    #[inline]
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        Self::generate_token(
            &self.access_keys,
            user_id,
            "access",
            self.access_token_expiry_secs,
        )
    }

    /// Generate a long-lived refresh token for a user
    #[inline]
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        Self::generate_token(
            &self.refresh_keys,
            user_id,
            "refresh",
            self.refresh_token_expiry_secs,
        )
    }

    fn generate_token(
        keys: &KeyPair,
        user_id: Uuid,
        token_type: &str,
        expiry_secs: i64,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate {} token: {}", token_type, e))
    }

    fn validate_token(keys: &KeyPair, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Validate an access token: signature, expiry and token family
    #[inline]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        let claims = Self::validate_token(&self.access_keys, token)?;
        if claims.token_type != "access" {
            return Err(anyhow::anyhow!("Not an access token"));
        }
        Ok(claims)
    }

    /// Validate a refresh token: signature, expiry and token family
    ///
    /// Signature validity alone does not make a refresh token usable;
    /// callers must also compare it against the value stored on the user
    /// record (the revocation check).
    #[inline]
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        let claims = Self::validate_token(&self.refresh_keys, token)?;
        if claims.token_type != "refresh" {
            return Err(anyhow::anyhow!("Not a refresh token"));
        }
        Ok(claims)
    }

    /// Get access token expiry in seconds
    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }
}

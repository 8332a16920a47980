/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT generation and validation for user sessions.
 * Access and refresh tokens are signed with separate secrets. Every refresh
 * token carries a random `jti`, so two tokens issued in the same second
 * still differ and rotation always invalidates the previous one.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::users::UserRecord;
use crate::shared::models::TokenPair;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub username: String,
    pub fullname: String,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl AccessClaims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    /// User ID
    pub sub: String,
    /// Unique token id
    pub jti: String,
    pub iat: u64,
    pub exp: u64,
}

impl RefreshClaims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Signing keys and lifetimes for both token kinds
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}

fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

impl TokenKeys {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl_secs: u64,
        refresh_ttl_secs: u64,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Issue a fresh access/refresh pair for a user
    pub fn issue_pair(&self, user: &UserRecord) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let now = now_secs();

        let access = AccessClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            iat: now,
            exp: now + self.access_ttl_secs,
        };
        let refresh = RefreshClaims {
            sub: user.id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.refresh_ttl_secs,
        };

        Ok(TokenPair {
            access_token: self.sign_access(&access)?,
            refresh_token: self.sign_refresh(&refresh)?,
        })
    }

    pub fn sign_access(&self, claims: &AccessClaims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.access_encoding)
    }

    pub fn sign_refresh(&self, claims: &RefreshClaims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.refresh_encoding)
    }

    /// Verify and decode an access token
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())?;
        Ok(data.claims)
    }

    /// Verify and decode a refresh token
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

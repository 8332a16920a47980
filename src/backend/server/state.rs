/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct holds:
 * - Server configuration
 * - Repository handles (Postgres or in-memory)
 * - JWT signing keys
 * - Per-route rate limiters
 *
 * Everything is behind `Arc`, so cloning the state per request is cheap.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::sessions::TokenKeys;
use crate::backend::middleware::rate_limit::AuthRateLimiter;
use crate::backend::server::config::ServerConfig;
use crate::backend::store::Repositories;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub repos: Repositories,
    pub tokens: Arc<TokenKeys>,
    pub login_limiter: AuthRateLimiter,
    pub register_limiter: AuthRateLimiter,
}

impl AppState {
    pub fn new(config: ServerConfig, repos: Repositories) -> Self {
        let tokens = TokenKeys::new(
            &config.access_token_secret,
            &config.refresh_token_secret,
            config.access_token_expiry_secs,
            config.refresh_token_expiry_secs,
        );
        let (login_limiter, register_limiter) = if config.rate_limit_enabled {
            (AuthRateLimiter::login(), AuthRateLimiter::register())
        } else {
            (AuthRateLimiter::disabled(), AuthRateLimiter::disabled())
        };

        Self {
            config: Arc::new(config),
            repos,
            tokens: Arc::new(tokens),
            login_limiter,
            register_limiter,
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::new(config, Repositories::in_memory())
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Repositories {
    fn from_ref(state: &AppState) -> Self {
        state.repos.clone()
    }
}

impl FromRef<AppState> for Arc<TokenKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

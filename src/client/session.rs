/**
 * Client Session
 *
 * Tokens and the signed-in user, shared by every clone of the client.
 */
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::shared::models::{AuthPayload, TokenPair, UserProfile};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
    /// True while a stored session is being checked against the server
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

impl Session {
    /// Session seeded with previously stored tokens, user not yet loaded
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState {
                access_token: Some(tokens.access_token),
                refresh_token: Some(tokens.refresh_token),
                user: None,
                loading: false,
            })),
        }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.inner.read().await.refresh_token.clone()
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.inner.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    pub async fn set_tokens(&self, tokens: TokenPair) {
        let mut state = self.inner.write().await;
        state.access_token = Some(tokens.access_token);
        state.refresh_token = Some(tokens.refresh_token);
    }

    pub async fn set_user(&self, user: Option<UserProfile>) {
        self.inner.write().await.user = user;
    }

    pub async fn set_loading(&self, loading: bool) {
        self.inner.write().await.loading = loading;
    }

    /// Store the result of a login or registration
    pub async fn sign_in(&self, payload: &AuthPayload) {
        let mut state = self.inner.write().await;
        state.access_token = Some(payload.access_token.clone());
        state.refresh_token = Some(payload.refresh_token.clone());
        state.user = Some(payload.user.clone());
        state.loading = false;
    }

    pub async fn clear(&self) {
        *self.inner.write().await = SessionState::default();
    }
}

//! Per-IP rate limiting for the login and register endpoints.
//!
//! Uses `governor`'s keyed limiter, one bucket per client IP:
//! - login: 5 attempts per 15 minutes
//! - register: 10 attempts per hour
//!
//! The client IP is the first `X-Forwarded-For` entry, else the socket peer
//! address, else `127.0.0.1`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::backend::error::BackendError;

const LOGIN_ATTEMPTS: u32 = 5;
const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);
const REGISTER_ATTEMPTS: u32 = 10;
const REGISTER_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

/// Keyed limiter plus the message sent when it trips
#[derive(Clone)]
pub struct AuthRateLimiter {
    limiter: Option<Arc<DefaultKeyedRateLimiter<IpAddr>>>,
    message: &'static str,
}

/// `attempts` requests per `window`, available as an immediate burst
fn window_quota(attempts: u32, window: Duration) -> Quota {
    let burst = NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN);
    Quota::with_period(window / burst.get())
        .map(|quota| quota.allow_burst(burst))
        .unwrap_or_else(|| Quota::per_second(burst))
}

impl AuthRateLimiter {
    pub fn new(attempts: u32, window: Duration, message: &'static str) -> Self {
        Self {
            limiter: Some(Arc::new(RateLimiter::keyed(window_quota(attempts, window)))),
            message,
        }
    }

    pub fn login() -> Self {
        Self::new(
            LOGIN_ATTEMPTS,
            LOGIN_WINDOW,
            "Too many login attempts, please try again after 15 minutes",
        )
    }

    pub fn register() -> Self {
        Self::new(
            REGISTER_ATTEMPTS,
            REGISTER_WINDOW,
            "Too many accounts created from this IP, please try again after an hour",
        )
    }

    /// A limiter that allows everything
    pub fn disabled() -> Self {
        Self {
            limiter: None,
            message: "",
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    pub fn check(&self, ip: IpAddr) -> RateLimitDecision {
        match &self.limiter {
            Some(limiter) if limiter.check_key(&ip).is_err() => RateLimitDecision::Limited,
            _ => RateLimitDecision::Allowed,
        }
    }
}

/// Resolve the client IP for rate limiting
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or_else(|| peer.map(|addr| addr.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Middleware applying an `AuthRateLimiter`
pub async fn rate_limit(
    State(limiter): State<AuthRateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    if limiter.is_enabled() {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0);
        let ip = client_ip(request.headers(), peer);

        if limiter.check(ip) == RateLimitDecision::Limited {
            tracing::warn!(%ip, path = %request.uri().path(), "Rate limit exceeded");
            return Err(BackendError::too_many_requests(limiter.message));
        }
    }

    Ok(next.run(request).await)
}

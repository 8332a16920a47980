/**
 * Session Cookies
 *
 * Builds the `Set-Cookie` headers for the `accessToken` and `refreshToken`
 * cookies and reads them back from request headers.
 */

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderName};
use axum::response::AppendHeaders;
use axum_extra::extract::CookieJar;

use crate::shared::models::TokenPair;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Cookie lifetime (7 days)
pub const COOKIE_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

/// Two `Set-Cookie` headers, one per token
pub type SessionCookies = AppendHeaders<[(HeaderName, String); 2]>;

fn cookie_header(name: &str, value: &str, max_age: u64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set both session cookies
pub fn set_session_cookies(tokens: &TokenPair, secure: bool) -> SessionCookies {
    AppendHeaders([
        (
            SET_COOKIE,
            cookie_header(ACCESS_COOKIE, &tokens.access_token, COOKIE_MAX_AGE_SECS, secure),
        ),
        (
            SET_COOKIE,
            cookie_header(REFRESH_COOKIE, &tokens.refresh_token, COOKIE_MAX_AGE_SECS, secure),
        ),
    ])
}

/// Expire both session cookies
pub fn clear_session_cookies(secure: bool) -> SessionCookies {
    AppendHeaders([
        (SET_COOKIE, cookie_header(ACCESS_COOKIE, "", 0, secure)),
        (SET_COOKIE, cookie_header(REFRESH_COOKIE, "", 0, secure)),
    ])
}

/// Read a non-empty cookie value
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

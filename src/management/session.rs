use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, SET_COOKIE},
};
use chrono::{DateTime, Duration, Utc};

use crate::{types::Token, utils};

pub const ACCESS_TOKEN_COOKIE: &str = "spotify_access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "spotify_refresh_token";
pub const TOKEN_EXPIRY_COOKIE: &str = "spotify_token_expiry";

/// Lifetime of the refresh token cookie, in seconds (30 days).
pub const REFRESH_TOKEN_MAX_AGE: i64 = 60 * 60 * 24 * 30;

/// Access tokens closer than this to their expiry are refreshed up front.
const REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Token cookies sent by the browser.
///
/// All cookies are `HttpOnly` and `SameSite=Lax`. They are not marked
/// `Secure` because the server runs on plain HTTP on localhost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expiry: Option<String>,
}

impl SessionCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = Self::default();

        for header in headers.get_all(COOKIE) {
            let Ok(header) = header.to_str() else {
                continue;
            };
            let get = |name: &str| {
                utils::find_cookie(header, name)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            };

            cookies.access_token = cookies.access_token.or_else(|| get(ACCESS_TOKEN_COOKIE));
            cookies.refresh_token = cookies.refresh_token.or_else(|| get(REFRESH_TOKEN_COOKIE));
            cookies.expiry = cookies.expiry.or_else(|| get(TOKEN_EXPIRY_COOKIE));
        }

        cookies
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }

    /// True when the expiry cookie is missing, unreadable or less than five
    /// minutes away from `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.expiry.as_deref().and_then(utils::parse_expiry) {
            Some(expiry) => expiry - now < Duration::seconds(REFRESH_MARGIN_SECS),
            None => true,
        }
    }

    /// Appends the `Set-Cookie` headers that store `token`.
    ///
    /// The refresh token cookie is only written when the token carries one,
    /// so a refresh response without rotation keeps the existing cookie.
    pub fn store(headers: &mut HeaderMap, token: &Token) {
        let expires = http_date(token.expiry);
        append(
            headers,
            format!(
                "{}={}; Path=/; Expires={}; HttpOnly; SameSite=Lax",
                ACCESS_TOKEN_COOKIE, token.access_token, expires
            ),
        );
        append(
            headers,
            format!(
                "{}={}; Path=/; Expires={}; HttpOnly; SameSite=Lax",
                TOKEN_EXPIRY_COOKIE,
                utils::format_expiry(token.expiry),
                expires
            ),
        );

        if !token.refresh_token.is_empty() {
            append(
                headers,
                format!(
                    "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
                    REFRESH_TOKEN_COOKIE, token.refresh_token, REFRESH_TOKEN_MAX_AGE
                ),
            );
        }
    }

    /// Appends the `Set-Cookie` headers that delete every token cookie.
    pub fn clear(headers: &mut HeaderMap) {
        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, TOKEN_EXPIRY_COOKIE] {
            append(
                headers,
                format!(
                    "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax",
                    name
                ),
            );
        }
    }
}

fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn append(headers: &mut HeaderMap, cookie: String) {
    // token values come from Spotify; anything that is not a valid header is dropped
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.append(SET_COOKIE, value);
    }
}

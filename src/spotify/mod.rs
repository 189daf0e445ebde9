//! # Spotify Integration Module
//!
//! This module is the layer between the web handlers and Spotify's services.
//! It talks to two hosts:
//!
//! - the **accounts service** (`/authorize`, `/api/token`) for the OAuth 2.0
//!   authorization-code flow and token refresh, see [`auth`],
//! - the **Web API** (`/v1/...`) for the user's saved tracks and player, see
//!   [`tracks`] and [`player`].
//!
//! All calls go through [`SpotifyClient`], which owns one connection pool and
//! the endpoint configuration, so tests can point it at a local fake.
//!
//! ## Transient errors
//!
//! `502 Bad Gateway` is retried after a pause and `429 Too Many Requests`
//! waits for the `Retry-After` header, unless it asks for more than
//! [`MAX_RETRY_AFTER`]. Both are bounded to [`MAX_ATTEMPTS`] tries; after
//! that the last response is treated like any other error status.
//!
//! ## API Coverage
//!
//! - `GET /me/tracks` - saved tracks, followed page by page
//! - `GET /me/player/devices` - available devices
//! - `GET /me/player` - current playback state
//! - `PUT /me/player/play` - start playback of a track on a device
//! - `POST /api/token` - code exchange and token refresh

use std::{fmt, time::Duration};

use reqwest::{Client, RequestBuilder, Response, StatusCode, header::RETRY_AFTER};
use tokio::time::sleep;

use crate::{config::OAuthConfig, warning};

pub mod auth;
pub mod player;
pub mod tracks;

pub const MAX_ATTEMPTS: u32 = 3;
pub const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);
/// Longest `Retry-After` worth waiting for inside a request; anything
/// longer is reported to the caller as a 429 right away.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_AFTER: u64 = 1;

#[derive(Debug)]
pub enum SpotifyError {
    /// Network failure or a malformed request.
    Http(reqwest::Error),
    /// Spotify answered with an unexpected status.
    Api { status: StatusCode, body: String },
    /// The response body did not match the expected shape.
    Decode(serde_json::Error),
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::Http(e) => write!(f, "request to spotify failed: {}", e),
            SpotifyError::Api { status, body } => {
                write!(f, "spotify API error {}: {}", status.as_u16(), body)
            }
            SpotifyError::Decode(e) => write!(f, "failed to decode response: {}", e),
        }
    }
}

impl std::error::Error for SpotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpotifyError::Http(e) => Some(e),
            SpotifyError::Decode(e) => Some(e),
            SpotifyError::Api { .. } => None,
        }
    }
}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::Http(err)
    }
}

impl From<serde_json::Error> for SpotifyError {
    fn from(err: serde_json::Error) -> Self {
        SpotifyError::Decode(err)
    }
}

/// Client for the Spotify accounts service and Web API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: OAuthConfig,
    bad_gateway_delay: Duration,
    max_retry_after: Duration,
}

impl SpotifyClient {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            bad_gateway_delay: BAD_GATEWAY_DELAY,
            max_retry_after: MAX_RETRY_AFTER,
        }
    }

    /// Pause before retrying a `502 Bad Gateway`, [`BAD_GATEWAY_DELAY`] by default.
    pub fn with_bad_gateway_delay(mut self, delay: Duration) -> Self {
        self.bad_gateway_delay = delay;
        self
    }

    /// Longest `Retry-After` that is waited for, [`MAX_RETRY_AFTER`] by default.
    pub fn with_max_retry_after(mut self, limit: Duration) -> Self {
        self.max_retry_after = limit;
        self
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Sends the request built by `build`, retrying on 502 and 429.
    ///
    /// The closure is called once per attempt because a sent
    /// `RequestBuilder` cannot be reused.
    async fn send<F>(&self, build: F) -> Result<Response, SpotifyError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 1;
        loop {
            let response = build(&self.http).send().await?;
            let status = response.status();

            if attempt >= MAX_ATTEMPTS {
                return Ok(response);
            }

            if status == StatusCode::BAD_GATEWAY {
                warning!(
                    "Spotify returned 502, retrying in {:?}",
                    self.bad_gateway_delay
                );
                sleep(self.bad_gateway_delay).await;
            } else if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = Duration::from_secs(retry_after(&response));
                if wait > self.max_retry_after {
                    warning!("Rate limited by Spotify for {:?}, giving up", wait);
                    return Ok(response);
                }
                warning!("Rate limited by Spotify, retrying in {:?}", wait);
                sleep(wait).await;
            } else {
                return Ok(response);
            }

            attempt += 1;
        }
    }
}

fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

/// Turns any status outside `accepted` into [`SpotifyError::Api`], keeping
/// the response body for the error message.
async fn expect_status(
    response: Response,
    accepted: &[StatusCode],
) -> Result<Response, SpotifyError> {
    let status = response.status();
    if accepted.contains(&status) {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SpotifyError::Api { status, body })
}

/// Reads the body and decodes it as JSON.
///
/// Goes through `serde_json` directly so decode failures are reported as
/// [`SpotifyError::Decode`] rather than as transport errors.
async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, SpotifyError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

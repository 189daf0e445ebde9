//! Configuration management for the liked tracks player.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage the Spotify application credentials, the OAuth and Web API endpoints
//! and the local server settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{Res, warning};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_REDIRECT_URL: &str = "http://127.0.0.1:3000/spotify-auth";
pub const DEFAULT_WEB_DIR: &str = "web";
pub const DEFAULT_SPOTIFY_API_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Permissions requested from the user during authorization.
///
/// The last two are needed to list devices and start playback.
pub const SPOTIFY_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "playlist-read-private",
    "user-library-read",
    "user-read-playback-state",
    "user-modify-playback-state",
];

/// Loads environment variables from `.env` files.
///
/// The working directory is tried first, then the platform-specific local
/// data directory under `bangerid/.env`. Variables that are already set in
/// the process environment are never overwritten. A missing file only
/// produces a warning; the values may still come from the real environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/bangerid/.env`
/// - macOS: `~/Library/Application Support/bangerid/.env`
/// - Windows: `%LOCALAPPDATA%/bangerid/.env`
pub async fn load_env() {
    if dotenv::dotenv().is_ok() {
        return;
    }

    let path = data_env_path();
    if async_fs::metadata(&path).await.is_ok() {
        if let Err(e) = dotenv::from_path(&path) {
            warning!("Failed to load {}: {}", path.display(), e);
        }
        return;
    }

    warning!(".env file not found, using system environment variables");
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("bangerid/.env");
    path
}

fn var_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Returns the Spotify application client ID, or an empty string when unset.
pub fn client_id() -> String {
    env::var("CLIENT_ID").unwrap_or_default()
}

/// Returns the Spotify application client secret, or an empty string when unset.
///
/// The client secret should be kept confidential and never exposed in logs.
pub fn client_secret() -> String {
    env::var("CLIENT_SECRET").unwrap_or_default()
}

/// Returns the OAuth redirect URI.
///
/// This must match the redirect URI registered in the Spotify application
/// settings and point at the `/spotify-auth` route of this server.
pub fn redirect_uri() -> String {
    var_or("REDIRECT_URL", DEFAULT_REDIRECT_URL)
}

/// Returns the address the HTTP server binds to, e.g. `127.0.0.1:3000`.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the directory holding `templates/` and `static/`.
pub fn web_dir() -> String {
    var_or("WEB_DIR", DEFAULT_WEB_DIR)
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_API_AUTH_URL)
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_API_TOKEN_URL)
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

/// Everything the server needs to talk to the Spotify accounts service and
/// Web API.
///
/// Built once at startup and shared with the handlers, so tests can point
/// the endpoints at a local fake without touching the environment.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl OAuthConfig {
    /// Reads the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Fails when `CLIENT_ID` or `CLIENT_SECRET` is missing or empty; the
    /// error message names the missing variables.
    pub fn from_env() -> Res<Self> {
        let client_id = client_id();
        let client_secret = client_secret();

        let missing: Vec<&str> = [("CLIENT_ID", &client_id), ("CLIENT_SECRET", &client_secret)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing required env vars: {}", missing.join(", ")).into());
        }

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri: redirect_uri(),
            scopes: SPOTIFY_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_url: spotify_apiauth_url(),
            token_url: spotify_apitoken_url(),
            api_url: spotify_apiurl(),
        })
    }

    /// Space separated scope list as sent to the authorization endpoint.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }
}

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Token set returned by the Spotify accounts service.
#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    /// Empty when Spotify did not send (or rotate) a refresh token.
    pub refresh_token: String,
    pub scope: String,
    pub expiry: DateTime<Utc>,
}

/// Raw body of `POST /api/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

impl TokenResponse {
    pub fn into_token(self, obtained_at: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token.unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expiry: obtained_at + Duration::seconds(self.expires_in),
        }
    }
}

/// A liked track, reduced to what the grid needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable track URI, used for playback.
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album_image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedFrom {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleAlbum {
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTrack {
    #[serde(default)]
    pub id: Option<String>,
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub linked_from: Option<LinkedFrom>,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    pub album: SimpleAlbum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTrackItem {
    #[serde(default)]
    pub added_at: Option<String>,
    pub track: SavedTrack,
}

/// One page of `GET /me/tracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedTracksResponse {
    pub items: Vec<SavedTrackItem>,
    /// URL of the next page, `None` on the last one.
    pub next: Option<String>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Can be missing for restricted devices, which cannot be controlled anyway.
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_restricted: bool,
    #[serde(default)]
    pub volume_percent: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayingItem {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub duration_ms: u64,
    /// Set when Spotify relinked the track for the user's market.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_from: Option<LinkedFrom>,
}

impl PlayingItem {
    /// URI as listed in the liked-track grid, the original one for a
    /// relinked track.
    pub fn stable_uri(&self) -> &str {
        self.linked_from
            .as_ref()
            .and_then(|linked| linked.uri.as_deref())
            .filter(|uri| !uri.is_empty())
            .unwrap_or(&self.uri)
    }
}

/// Subset of `GET /me/player` the page uses to highlight the playing track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackState {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub item: Option<PlayingItem>,
    #[serde(default)]
    pub device: Option<Device>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayRequest {
    pub device_id: String,
    pub track_uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartPlaybackBody {
    pub uris: Vec<String>,
}

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::AccessToken;
use crate::{
    info,
    server::AppState,
    spotify::SpotifyError,
    types::{Device, PlayRequest, PlaybackState, Track},
    warning,
};

/// JSON error returned by the library endpoints.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Spotify(SpotifyError),
}

impl From<SpotifyError> for ApiError {
    fn from(err: SpotifyError) -> Self {
        ApiError::Spotify(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Spotify(err) => {
                warning!("{}", err);
                // a rejected token means the session is gone; let the page send the user to /login
                let status = match &err {
                    SpotifyError::Api { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                        StatusCode::UNAUTHORIZED
                    }
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, err.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TracksQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// Liked tracks, served from the cache unless it is empty (or holds no
/// tracks) or `refresh=true`.
pub async fn tracks(
    State(state): State<AppState>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    Query(query): Query<TracksQuery>,
) -> Result<Json<Vec<Track>>, ApiError> {
    if !query.refresh {
        if let Some(cached) = state.tracks.get().await.filter(|t| !t.is_empty()) {
            return Ok(Json(cached.as_ref().clone()));
        }
    }

    let fetched = state.spotify.fetch_liked_tracks(&token).await?;
    info!("Fetched {} liked tracks", fetched.len());

    let cached = state.tracks.set(fetched).await;
    Ok(Json(cached.as_ref().clone()))
}

pub async fn devices(
    State(state): State<AppState>,
    Extension(AccessToken(token)): Extension<AccessToken>,
) -> Result<Json<Vec<Device>>, ApiError> {
    Ok(Json(state.spotify.fetch_devices(&token).await?))
}

/// Current playback, `null` when nothing is active.
pub async fn player(
    State(state): State<AppState>,
    Extension(AccessToken(token)): Extension<AccessToken>,
) -> Result<Json<Option<PlaybackState>>, ApiError> {
    Ok(Json(state.spotify.fetch_playback_state(&token).await?))
}

pub async fn play(
    State(state): State<AppState>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    Json(request): Json<PlayRequest>,
) -> Result<StatusCode, ApiError> {
    if request.device_id.is_empty() || request.track_uri.is_empty() {
        return Err(ApiError::BadRequest(
            "device_id and track_uri are required".to_string(),
        ));
    }

    state
        .spotify
        .play_track(&token, &request.device_id, &request.track_uri)
        .await?;
    info!(
        "Playing {} on device {}",
        request.track_uri, request.device_id
    );

    Ok(StatusCode::NO_CONTENT)
}

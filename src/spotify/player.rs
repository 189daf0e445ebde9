use reqwest::StatusCode;

use super::{SpotifyClient, SpotifyError, decode_json, expect_status};
use crate::types::{Device, DevicesResponse, PlaybackState, StartPlaybackBody};

impl SpotifyClient {
    /// Starts playback of `track_uri` on the device `device_id`.
    ///
    /// Spotify answers `204 No Content` on success, some endpoints have been
    /// seen returning `200`; both are accepted.
    pub async fn play_track(
        &self,
        token: &str,
        device_id: &str,
        track_uri: &str,
    ) -> Result<(), SpotifyError> {
        let url = self.api_url("/me/player/play");
        let body = StartPlaybackBody {
            uris: vec![track_uri.to_string()],
        };

        let response = self
            .send(|http| {
                http.put(&url)
                    .query(&[("device_id", device_id)])
                    .bearer_auth(token)
                    .json(&body)
            })
            .await?;

        expect_status(response, &[StatusCode::OK, StatusCode::NO_CONTENT]).await?;
        Ok(())
    }

    /// Lists the devices the user can currently play on.
    pub async fn fetch_devices(&self, token: &str) -> Result<Vec<Device>, SpotifyError> {
        let url = self.api_url("/me/player/devices");
        let response = self.send(|http| http.get(&url).bearer_auth(token)).await?;
        let response = expect_status(response, &[StatusCode::OK]).await?;

        let res: DevicesResponse = decode_json(response).await?;
        Ok(res.devices)
    }

    /// Returns what is playing right now, or `None` when no device is active.
    pub async fn fetch_playback_state(
        &self,
        token: &str,
    ) -> Result<Option<PlaybackState>, SpotifyError> {
        let url = self.api_url("/me/player");
        let response = self.send(|http| http.get(&url).bearer_auth(token)).await?;
        let response = expect_status(response, &[StatusCode::OK, StatusCode::NO_CONTENT]).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let state: PlaybackState = decode_json(response).await?;
        Ok(Some(state))
    }
}

use reqwest::StatusCode;

use super::{SpotifyClient, SpotifyError, decode_json, expect_status};
use crate::{
    types::{SavedTrackItem, SavedTracksResponse, Track},
    utils, warning,
};

/// Page size for `/me/tracks`; 50 is the maximum Spotify allows.
pub const PAGE_LIMIT: u32 = 50;

impl SpotifyClient {
    /// Retrieves all of the user's saved tracks.
    ///
    /// Starts at the first page and follows the `next` URL Spotify returns
    /// until it is `null`. `market=from_token` makes Spotify relink tracks for
    /// the user's country, see [`utils::stable_track_uri`].
    ///
    /// Tracks without any album image are left out.
    pub async fn fetch_liked_tracks(&self, token: &str) -> Result<Vec<Track>, SpotifyError> {
        let mut all_tracks = Vec::new();
        let mut next_url = Some(self.api_url(&format!(
            "/me/tracks?limit={limit}&market=from_token",
            limit = PAGE_LIMIT
        )));

        while let Some(url) = next_url {
            let response = self.send(|http| http.get(&url).bearer_auth(token)).await?;
            let response = expect_status(response, &[StatusCode::OK]).await?;
            let page: SavedTracksResponse = decode_json(response).await?;

            all_tracks.extend(normalize_tracks(&page.items));
            next_url = page.next;
        }

        Ok(all_tracks)
    }
}

/// Reduces saved track items to [`Track`]s, skipping items with no album
/// images.
pub fn normalize_tracks(items: &[SavedTrackItem]) -> Vec<Track> {
    items
        .iter()
        .filter_map(|item| {
            let saved = &item.track;
            let id = utils::stable_track_uri(saved).to_string();

            let Some(album_image) = utils::select_album_image(&saved.album.images) else {
                warning!(
                    "Track '{}' (ID: {}) has no album images - skipping",
                    saved.name,
                    id
                );
                return None;
            };

            Some(Track {
                id,
                name: saved.name.clone(),
                artist: saved
                    .artists
                    .first()
                    .map(|artist| artist.name.clone())
                    .unwrap_or_default(),
                album_image: album_image.to_string(),
            })
        })
        .collect()
}

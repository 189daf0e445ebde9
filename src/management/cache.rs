use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::types::Track;

#[derive(Debug)]
struct CachedTracks {
    tracks: Arc<Vec<Track>>,
    fetched_at: DateTime<Utc>,
}

/// Liked tracks of the signed-in user, kept between page loads.
///
/// The application serves a single user, so there is one slot. It is filled
/// on the first `/api/tracks` request, replaced on an explicit refresh and
/// emptied on logout.
#[derive(Debug, Clone, Default)]
pub struct TrackCache {
    inner: Arc<RwLock<Option<CachedTracks>>>,
}

impl TrackCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Arc<Vec<Track>>> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|cached| Arc::clone(&cached.tracks))
    }

    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.as_ref().map(|cached| cached.fetched_at)
    }

    pub async fn set(&self, tracks: Vec<Track>) -> Arc<Vec<Track>> {
        let tracks = Arc::new(tracks);
        *self.inner.write().await = Some(CachedTracks {
            tracks: Arc::clone(&tracks),
            fetched_at: Utc::now(),
        });
        tracks
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

use std::{
    collections::HashMap,
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

/// How long a login attempt may take before its state is rejected.
pub const STATE_TTL: Duration = Duration::from_secs(2 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// The state was never issued, or has already been used.
    Unknown,
    /// The state was issued more than [`STATE_TTL`] ago.
    Expired,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Unknown => write!(f, "Invalid state parameter"),
            StateError::Expired => write!(f, "State token expired"),
        }
    }
}

impl std::error::Error for StateError {}

/// In-memory store of OAuth `state` values issued by `/login`.
///
/// A state lives for one login round trip: it is inserted when the user is
/// sent to Spotify and removed again when the callback arrives, whether it is
/// accepted or not. Abandoned logins are swept by [`StateStore::cleanup_expired`].
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    states: Arc<Mutex<HashMap<String, Instant>>>,
    ttl: Option<Duration>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a custom lifetime instead of [`STATE_TTL`].
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            states: Arc::default(),
            ttl: Some(ttl),
        }
    }

    fn ttl(&self) -> Duration {
        self.ttl.unwrap_or(STATE_TTL)
    }

    pub async fn insert(&self, state: String) {
        self.states.lock().await.insert(state, Instant::now());
    }

    /// Removes `state` and returns when it was issued.
    ///
    /// Fails for unknown states and for states older than the lifetime; the
    /// state is gone afterwards either way.
    pub async fn take(&self, state: &str) -> Result<Instant, StateError> {
        let created_at = self
            .states
            .lock()
            .await
            .remove(state)
            .ok_or(StateError::Unknown)?;

        if created_at.elapsed() > self.ttl() {
            return Err(StateError::Expired);
        }

        Ok(created_at)
    }

    /// Removes states older than the lifetime. Returns how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let ttl = self.ttl();
        let mut states = self.states.lock().await;
        let before = states.len();
        states.retain(|_, created_at| created_at.elapsed() <= ttl);
        before - states.len()
    }

    pub async fn len(&self) -> usize {
        self.states.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.lock().await.is_empty()
    }
}

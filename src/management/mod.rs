mod cache;
mod session;
mod state;

pub use cache::TrackCache;
pub use session::{
    ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_MAX_AGE, SessionCookies,
    TOKEN_EXPIRY_COOKIE,
};
pub use state::{STATE_TTL, StateError, StateStore};

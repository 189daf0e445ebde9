//! # API Module
//!
//! HTTP handlers and middleware of the web application.
//!
//! ## Endpoints
//!
//! ### Pages
//!
//! - [`home`] - Renders the main page, with the library or a login prompt
//! - [`not_found`] - Fallback for unknown paths
//!
//! ### Authentication
//!
//! - [`login`] - Starts the OAuth authorization-code flow
//! - [`callback`] - Receives the authorization code and stores the tokens
//! - [`logout`] - Drops the token cookies
//!
//! ### Library and player (authenticated)
//!
//! - [`tracks`] - The user's liked tracks
//! - [`devices`] - Devices available for playback
//! - [`player`] - What is playing right now
//! - [`play`] - Start a track on a device
//!
//! ### Monitoring
//!
//! - [`health`] - Status and version information
//!
//! ## Middleware
//!
//! - [`require_auth`] - Ensures a valid access token, refreshing it when it
//!   is about to expire, and passes it on as [`AccessToken`]
//! - [`log_requests`] - Logs method, path, status and duration of every
//!   request

mod auth;
mod health;
mod home;
mod library;
mod logging;
mod require_auth;

pub use auth::{AuthError, callback, login, logout};
pub use health::health;
pub use home::{home, not_found};
pub use library::{ApiError, devices, play, player, tracks};
pub use logging::log_requests;
pub use require_auth::{AccessToken, require_auth};

//! Liked Tracks Player Library
//!
//! This library powers a small personal web application that signs a user in
//! to Spotify, lists the tracks they saved to their library and starts playback
//! of a chosen track on one of their active devices.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and middleware of the web application
//! - `config` - Configuration management and environment variables
//! - `management` - In-memory OAuth state, session cookies and the track cache
//! - `server` - Router construction and the HTTP listener
//! - `spotify` - Spotify accounts and Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use bangerid::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> bangerid::Res<()> {
//!     config::load_env().await;
//!     let oauth = config::OAuthConfig::from_env()?;
//!     server::start_server(oauth, "127.0.0.1:3000", "web").await
//! }
//! ```

pub mod api;
pub mod config;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used for top-level plumbing (configuration, server startup) where the
/// concrete error type does not matter to the caller. Keeps `Send + Sync`
/// bounds so errors can cross `tokio` tasks.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Server listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Token refreshed successfully");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for failures during startup where the server cannot run at
/// all, such as missing credentials or an address that cannot be bound.
/// Request handlers never call it.
///
/// # Example
///
/// ```
/// error!("Missing required environment variables: {}", vars);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems: a failed token refresh, a Spotify call
/// that returned an error, a track skipped while normalizing the library.
///
/// # Example
///
/// ```
/// warning!("Track '{}' has no album images, skipping", name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

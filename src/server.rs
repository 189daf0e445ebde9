use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    Res, api,
    config::OAuthConfig,
    info,
    management::{StateStore, TrackCache},
    spotify::SpotifyClient,
};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub spotify: SpotifyClient,
    pub states: StateStore,
    pub tracks: TrackCache,
    /// Directory holding `templates/` and `static/`.
    pub web_dir: PathBuf,
}

impl AppState {
    pub fn new(config: OAuthConfig, web_dir: impl Into<PathBuf>) -> Self {
        Self {
            spotify: SpotifyClient::new(config),
            states: StateStore::new(),
            tracks: TrackCache::new(),
            web_dir: web_dir.into(),
        }
    }
}

/// Builds the application router.
///
/// Routes under `/api` go through [`api::require_auth`]; everything is
/// wrapped in the request logger.
pub fn router(state: AppState) -> Router {
    let authenticated = Router::new()
        .route("/tracks", get(api::tracks))
        .route("/devices", get(api::devices))
        .route("/player", get(api::player))
        .route("/play", post(api::play))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_auth,
        ));

    let static_files = ServeDir::new(state.web_dir.join("static"));

    Router::new()
        .route("/", get(api::home))
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/spotify-auth", get(api::callback))
        .route("/logout", get(api::logout))
        .nest("/api", authenticated)
        .nest_service("/static", static_files)
        .fallback(api::not_found)
        .layer(middleware::from_fn(api::log_requests))
        .with_state(state)
}

/// Binds `addr` and serves the application until the process is stopped.
pub async fn start_server(config: OAuthConfig, addr: &str, web_dir: &str) -> Res<()> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address '{}': {}", addr, e))?;

    let app = router(AppState::new(config, web_dir));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server starting at http://{}", addr);
    info!("Authenticate at http://{}/login", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::{management::SessionCookies, server::AppState, utils, warning};

/// Renders `templates/index.html`.
///
/// The template gets `logged_in` plus two helpers that hide the login
/// prompt or the library section, so the page works before the script runs.
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let logged_in = SessionCookies::from_headers(&headers).is_logged_in();
    let path = state.web_dir.join("templates").join("index.html");

    let template = match async_fs::read_to_string(&path).await {
        Ok(t) => t,
        Err(e) => {
            warning!("Failed to read template {}: {}", path.display(), e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    let hidden = |hide: bool| if hide { "hidden" } else { "" };
    let page = utils::render_template(
        &template,
        &[
            ("logged_in", if logged_in { "true" } else { "false" }),
            ("login_hidden", hidden(logged_in)),
            ("library_hidden", hidden(!logged_in)),
        ],
    );

    Html(page).into_response()
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 page not found")
}

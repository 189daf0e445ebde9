use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::{info, management::SessionCookies, server::AppState, success, warning};

/// Access token of the current request, inserted by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

fn to_login() -> Response {
    Redirect::temporary("/login").into_response()
}

/// Lets a request through only with a usable access token.
///
/// Without an access token cookie the browser is sent to `/login`. When the
/// token expires within five minutes (or its expiry is unknown) it is
/// refreshed first, and the new cookies are attached to the response. If no
/// refresh token is available, or the refresh fails, the user has to log in
/// again.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookies = SessionCookies::from_headers(request.headers());

    let Some(access_token) = cookies.access_token.clone() else {
        info!("No access token found, redirecting to login");
        return to_login();
    };

    if !cookies.needs_refresh(Utc::now()) {
        request.extensions_mut().insert(AccessToken(access_token));
        return next.run(request).await;
    }

    let Some(refresh_token) = cookies.refresh_token.as_deref() else {
        info!("Token expired and no refresh token, redirecting to login");
        return to_login();
    };

    let token = match state.spotify.refresh_token(refresh_token).await {
        Ok(token) => token,
        Err(e) => {
            warning!("Failed to refresh token: {}", e);
            return to_login();
        }
    };
    success!("Token refreshed successfully");

    request
        .extensions_mut()
        .insert(AccessToken(token.access_token.clone()));
    let mut response = next.run(request).await;
    SessionCookies::store(response.headers_mut(), &token);

    response
}

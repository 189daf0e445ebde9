use std::fmt;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    management::{SessionCookies, StateError},
    server::AppState,
    success, utils, warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Ways the login round trip can fail. Each maps to a plain text response.
#[derive(Debug)]
pub enum AuthError {
    StateGeneration(String),
    InvalidAuthorizeUrl(String),
    /// Spotify redirected back with `error=...`, e.g. the user denied access.
    Denied(String),
    State(StateError),
    MissingCode,
    Exchange(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::StateGeneration(_) => write!(f, "Failed to generate state"),
            AuthError::InvalidAuthorizeUrl(_) => write!(f, "Failed to build authorization URL"),
            AuthError::Denied(reason) => write!(f, "Spotify authorization failed: {}", reason),
            AuthError::State(e) => write!(f, "{}", e),
            AuthError::MissingCode => write!(f, "Missing authorization code"),
            AuthError::Exchange(_) => write!(f, "Failed to exchange token"),
        }
    }
}

impl From<StateError> for AuthError {
    fn from(err: StateError) -> Self {
        AuthError::State(err)
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::StateGeneration(_)
            | AuthError::InvalidAuthorizeUrl(_)
            | AuthError::Exchange(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Denied(_) | AuthError::State(_) | AuthError::MissingCode => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::StateGeneration(detail)
            | AuthError::InvalidAuthorizeUrl(detail)
            | AuthError::Exchange(detail) => warning!("{}: {}", self, detail),
            _ => warning!("{}", self),
        }

        (self.status(), self.to_string()).into_response()
    }
}

/// Sends the browser to Spotify's consent page.
///
/// A fresh `state` is remembered for the callback, and abandoned states from
/// earlier logins are swept in the background.
pub async fn login(State(state): State<AppState>) -> Result<Redirect, AuthError> {
    let csrf_state = utils::generate_state().map_err(AuthError::StateGeneration)?;
    let auth_url = state
        .spotify
        .authorize_url(&csrf_state)
        .map_err(AuthError::InvalidAuthorizeUrl)?;

    state.states.insert(csrf_state).await;

    let store = state.states.clone();
    tokio::spawn(async move {
        store.cleanup_expired().await;
    });

    Ok(Redirect::temporary(&auth_url))
}

/// Redirect target of the authorization flow.
///
/// Checks the `state`, exchanges the code and stores the tokens in cookies
/// before sending the browser back to the main page.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<(HeaderMap, Redirect), AuthError> {
    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        return Err(AuthError::Denied(error));
    }

    state
        .states
        .take(params.state.as_deref().unwrap_or_default())
        .await?;

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AuthError::MissingCode)?;

    let token = state
        .spotify
        .exchange_code(&code)
        .await
        .map_err(|e| AuthError::Exchange(e.to_string()))?;

    let mut headers = HeaderMap::new();
    SessionCookies::store(&mut headers, &token);
    success!("Authentication successful");

    Ok((headers, Redirect::temporary("/")))
}

/// Deletes the token cookies and forgets the cached library.
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Redirect) {
    state.tracks.clear().await;

    let mut headers = HeaderMap::new();
    SessionCookies::clear(&mut headers);

    (headers, Redirect::to("/"))
}

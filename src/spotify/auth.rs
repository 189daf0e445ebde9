use chrono::Utc;
use reqwest::{StatusCode, Url};

use super::{SpotifyClient, SpotifyError, decode_json, expect_status};
use crate::types::{Token, TokenResponse};

impl SpotifyClient {
    /// Builds the URL of Spotify's consent page.
    ///
    /// Adds `client_id`, `response_type=code`, `redirect_uri`, `scope` and
    /// the CSRF `state` to the configured authorization endpoint, with
    /// proper query encoding.
    ///
    /// # Errors
    ///
    /// Fails only when the configured authorization URL is not a valid URL.
    pub fn authorize_url(&self, state: &str) -> Result<String, String> {
        let config = self.config();
        let scope = config.scope();
        let url = Url::parse_with_params(
            &config.auth_url,
            &[
                ("client_id", config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| format!("invalid authorization URL {}: {}", config.auth_url, e))?;

        Ok(url.into())
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// This is the server side of the callback: the code is sent together
    /// with the redirect URI, and the application authenticates with HTTP
    /// basic auth using its client ID and secret.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, SpotifyError> {
        let config = self.config();
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .await
    }

    /// Gets a fresh access token using a refresh token.
    ///
    /// The returned token's `refresh_token` is empty unless Spotify rotated
    /// it, in which case the new value must replace the old one.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<Token, SpotifyError> {
        let config = self.config();
        let response = self
            .send(|http| {
                http.post(&config.token_url)
                    .basic_auth(&config.client_id, Some(&config.client_secret))
                    .form(form)
            })
            .await?;

        let response = expect_status(response, &[StatusCode::OK]).await?;
        let token: TokenResponse = decode_json(response).await?;
        Ok(token.into_token(Utc::now()))
    }
}

//! Google OAuth service: consent redirect and code exchange.
//!
//! The Google ID token obtained here is handed to the identity provider's
//! `sign_in_with_google`; this module never creates sessions itself.

use serde::Deserialize;

use super::identity::AuthError;

pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google OAuth client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_url: String,
}

impl GoogleConfig {
    /// Returns `None` unless all three values are present (Google sign-in
    /// is then disabled).
    #[must_use]
    pub fn from_values(
        client_id: Option<String>,
        client_secret: Option<String>,
        redirect_uri: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            client_id: client_id?,
            client_secret: client_secret?,
            redirect_uri: redirect_uri?,
            token_url: GOOGLE_TOKEN_URL.to_owned(),
        })
    }

    /// Build the consent-screen URL carrying the CSRF `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the authorize URL cannot be parsed.
    pub fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let url = reqwest::Url::parse_with_params(
            GOOGLE_AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| AuthError::Parse(e.to_string()))?;
        Ok(url.into())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
}

/// Exchange an authorization code for a Google ID token.
///
/// # Errors
///
/// `Rejected` when Google refuses the code, otherwise transport/parse errors.
pub async fn exchange_code(http: &reqwest::Client, config: &GoogleConfig, code: &str) -> Result<String, AuthError> {
    let resp = http
        .post(&config.token_url)
        .form(&[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AuthError::Request(e.to_string()))?;

    let status = resp.status().as_u16();
    let body = resp
        .text()
        .await
        .map_err(|e| AuthError::Request(e.to_string()))?;

    if status != 200 {
        if let Ok(err) = serde_json::from_str::<TokenErrorResponse>(&body) {
            return Err(AuthError::Rejected { code: err.error });
        }
        return Err(AuthError::Response { status, body });
    }

    let token: TokenResponse =
        serde_json::from_str(&body).map_err(|_| AuthError::Parse(format!("unexpected token response: {body}")))?;
    Ok(token.id_token)
}

#[cfg(test)]
#[path = "google_test.rs"]
mod tests;

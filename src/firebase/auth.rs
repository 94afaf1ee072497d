//! Identity Toolkit / Secure Token REST client.
//!
//! Thin HTTP wrapper for `accounts:signInWithPassword`, `accounts:signUp`,
//! `accounts:signInWithIdp` and the refresh-token exchange. Pure parsing in
//! `parse_sign_in` / `parse_refresh` for testability.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error_code;
use crate::services::identity::{AuthError, Identity, IdentityProvider, SignedIn, TokenSet};

/// Used when the provider omits or garbles `expiresIn`.
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

// =============================================================================
// CLIENT
// =============================================================================

pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    identity_base: String,
    secure_token_base: String,
}

impl FirebaseAuth {
    #[must_use]
    pub fn new(http: reqwest::Client, api_key: String, identity_base: &str, secure_token_base: &str) -> Self {
        Self {
            http,
            api_key,
            identity_base: identity_base.trim_end_matches('/').to_owned(),
            secure_token_base: secure_token_base.trim_end_matches('/').to_owned(),
        }
    }

    fn accounts_url(&self, method: &str) -> String {
        format!("{}/v1/accounts:{method}", self.identity_base)
    }

    async fn post_accounts<B: Serialize + Sync>(&self, method: &str, body: &B) -> Result<SignedIn, AuthError> {
        let response = self
            .http
            .post(self.accounts_url(method))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let text = read_success(response).await?;
        parse_sign_in(&text)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let body = PasswordRequest { email, password, return_secure_token: true };
        self.post_accounts("signInWithPassword", &body).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let body = PasswordRequest { email, password, return_secure_token: true };
        self.post_accounts("signUp", &body).await
    }

    async fn sign_in_with_google(&self, google_id_token: &str, request_uri: &str) -> Result<SignedIn, AuthError> {
        let post_body = format!("id_token={google_id_token}&providerId=google.com");
        let body = IdpRequest { post_body: &post_body, request_uri, return_secure_token: true };
        self.post_accounts("signInWithIdp", &body).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError> {
        let response = self
            .http
            .post(format!("{}/v1/token", self.secure_token_base))
            .query(&[("key", self.api_key.as_str())])
            .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let text = read_success(response).await?;
        parse_refresh(&text)
    }
}

/// Return the body of a 2xx response, or map the provider's error.
async fn read_success(response: reqwest::Response) -> Result<String, AuthError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| AuthError::Request(e.to_string()))?;

    if !(200..300).contains(&status) {
        return Err(match error_code(&text) {
            Some(code) if status < 500 => AuthError::Rejected { code },
            _ => AuthError::Response { status, body: text },
        });
    }
    Ok(text)
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    post_body: &'a str,
    request_uri: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

/// The Secure Token API answers in `snake_case`, unlike Identity Toolkit.
#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

pub(crate) fn parse_sign_in(body: &str) -> Result<SignedIn, AuthError> {
    let resp: SignInResponse = serde_json::from_str(body).map_err(|e| AuthError::Parse(e.to_string()))?;
    let ttl = token_ttl(resp.expires_in.as_deref());
    Ok(SignedIn {
        identity: Identity {
            uid: resp.local_id,
            email: resp.email.filter(|e| !e.is_empty()),
            display_name: resp.display_name.filter(|n| !n.is_empty()),
            photo_url: resp.photo_url.filter(|u| !u.is_empty()),
        },
        tokens: TokenSet::new(resp.id_token, resp.refresh_token, ttl),
    })
}

pub(crate) fn parse_refresh(body: &str) -> Result<TokenSet, AuthError> {
    let resp: RefreshResponse = serde_json::from_str(body).map_err(|e| AuthError::Parse(e.to_string()))?;
    let ttl = token_ttl(resp.expires_in.as_deref());
    Ok(TokenSet::new(resp.id_token, resp.refresh_token, ttl))
}

fn token_ttl(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TOKEN_TTL_SECS);
    Duration::from_secs(secs)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

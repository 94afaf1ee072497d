//! Identity provider seam: who the user is and the tokens proving it.
//!
//! `FirebaseAuth` implements [`IdentityProvider`] over the Identity Toolkit
//! REST API. Route handlers only ever see [`AuthError::user_message`], a
//! single human-readable string for the login view.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Tokens are treated as expired this long before the provider's deadline.
const EXPIRY_SKEW: Duration = Duration::from_secs(30);

/// Public profile of a signed-in user. Safe to render and serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl Identity {
    /// Name for greetings: display name, else email, else "User".
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        non_blank(self.display_name.as_deref())
            .or_else(|| non_blank(self.email.as_deref()))
            .unwrap_or("User")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Provider credentials backing a session. Never leaves the server.
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: Instant,
}

impl TokenSet {
    #[must_use]
    pub fn new(id_token: String, refresh_token: String, expires_in: Duration) -> Self {
        Self { id_token, refresh_token, expires_at: Instant::now() + expires_in }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now + EXPIRY_SKEW >= self.expires_at
    }
}

/// Result of a successful sign-in or sign-up.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub identity: Identity,
    pub tokens: TokenSet,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider refused the credentials; `code` is its error code.
    #[error("rejected by identity provider: {code}")]
    Rejected { code: String },
    #[error("sign-in was cancelled")]
    Cancelled,
    #[error("oauth state mismatch")]
    InvalidState,
    #[error("sign-in method not configured")]
    NotConfigured,
    #[error("identity request failed: {0}")]
    Request(String),
    #[error("identity provider returned status {status}: {body}")]
    Response { status: u16, body: String },
    #[error("identity response parse failed: {0}")]
    Parse(String),
}

impl AuthError {
    /// The one message shown inline on the login view.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { code } => rejection_message(code),
            Self::Cancelled => "Google sign-in was cancelled.".to_owned(),
            Self::InvalidState => "Your sign-in attempt expired. Please try again.".to_owned(),
            Self::NotConfigured => "This sign-in method is not available.".to_owned(),
            Self::Request(_) | Self::Response { .. } | Self::Parse(_) => {
                "Could not reach the sign-in service. Please try again.".to_owned()
            }
        }
    }
}

fn rejection_message(code: &str) -> String {
    let message = match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => "Invalid email or password.",
        "EMAIL_EXISTS" => "An account with this email already exists.",
        "WEAK_PASSWORD" => "Password should be at least 6 characters.",
        "INVALID_EMAIL" | "MISSING_EMAIL" => "Enter a valid email address.",
        "MISSING_PASSWORD" => "Enter your password.",
        "USER_DISABLED" => "This account has been disabled.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Please try again later.",
        "OPERATION_NOT_ALLOWED" => "This sign-in method is not enabled.",
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => "Your session has expired. Please sign in again.",
        "invalid_grant" => "Google sign-in failed. Please try again.",
        other => return format!("Authentication failed ({other})."),
    };
    message.to_owned()
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignedIn, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignedIn, AuthError>;

    /// Exchange a Google ID token for a provider session. `request_uri` is
    /// the redirect URI the token was issued for.
    async fn sign_in_with_google(&self, google_id_token: &str, request_uri: &str) -> Result<SignedIn, AuthError>;

    /// Mint fresh tokens from a refresh token. The identity is unchanged.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError>;
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;

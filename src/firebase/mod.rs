//! Firebase REST clients.
//!
//! DESIGN
//! ======
//! Both clients are thin HTTP wrappers constructed once in `main` and shared
//! through `AppState` behind their service traits. Response parsing is kept
//! in pure functions so it can be tested without a network.

pub mod auth;
pub mod firestore;

use std::time::Duration;

use serde::Deserialize;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Build the shared HTTP client used by every Firebase call.
///
/// # Errors
///
/// Returns an error if the TLS backend fails to initialize.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Extract the Google API error code from an error body.
///
/// Identity Toolkit puts the code in `message`, sometimes followed by
/// `" : detail"`; other APIs use `status`.
pub(crate) fn error_code(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    let code = envelope
        .error
        .message
        .split(" : ")
        .next()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_owned);
    code.or(envelope.error.status)
}

//! Application configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Parsing goes through a lookup closure so tests can feed a map instead of
//! mutating process-global env. `from_env` is the only caller that touches
//! `std::env`.
//!
//! The six Firebase values are never validated here. A missing value is
//! logged and left empty; the provider rejects the request later.

use std::path::PathBuf;

use tracing::warn;

use crate::services::google::GoogleConfig;
use crate::services::guard::AdminPolicy;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_COLLECTION: &str = "contribution";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
pub const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";
pub const FIRESTORE_URL: &str = "https://firestore.googleapis.com";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

// =============================================================================
// FIREBASE
// =============================================================================

/// Firebase project settings. All six are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

/// Base URLs for the Firebase REST APIs. Overridden for emulators and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseEndpoints {
    pub identity_toolkit: String,
    pub secure_token: String,
    pub firestore: String,
}

impl Default for FirebaseEndpoints {
    fn default() -> Self {
        Self {
            identity_toolkit: IDENTITY_TOOLKIT_URL.to_owned(),
            secure_token: SECURE_TOKEN_URL.to_owned(),
            firestore: FIRESTORE_URL.to_owned(),
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub firebase: FirebaseConfig,
    pub endpoints: FirebaseEndpoints,
    /// Firestore collection holding one document per user email.
    pub collection: String,
    pub admin: AdminPolicy,
    pub cookie_secure: bool,
    /// `None` disables the "Continue with Google" flow.
    pub google: Option<GoogleConfig>,
    pub http_timeout_secs: u64,
    pub assets_dir: PathBuf,
}

impl AppConfig {
    /// Build typed config from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a typed value (port, timeout, boolean) fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a typed value (port, timeout, boolean) fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let http_timeout_secs =
            parse_or("FIREBASE_HTTP_TIMEOUT_SECS", lookup("FIREBASE_HTTP_TIMEOUT_SECS"), DEFAULT_HTTP_TIMEOUT_SECS)?;

        let firebase = FirebaseConfig {
            api_key: firebase_value(&lookup, "FIREBASE_API_KEY"),
            auth_domain: firebase_value(&lookup, "FIREBASE_AUTH_DOMAIN"),
            project_id: firebase_value(&lookup, "FIREBASE_PROJECT_ID"),
            storage_bucket: firebase_value(&lookup, "FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: firebase_value(&lookup, "FIREBASE_MESSAGING_SENDER_ID"),
            app_id: firebase_value(&lookup, "FIREBASE_APP_ID"),
        };

        let endpoints = endpoints_from(
            non_empty(lookup("FIREBASE_AUTH_EMULATOR_HOST")).as_deref(),
            non_empty(lookup("FIRESTORE_EMULATOR_HOST")).as_deref(),
        );

        let collection = non_empty(lookup("CONTRIBUTION_COLLECTION")).unwrap_or_else(|| DEFAULT_COLLECTION.to_owned());
        let admin = AdminPolicy::from_list(lookup("ADMIN_EMAILS").as_deref().unwrap_or_default());
        if admin.is_empty() {
            warn!("ADMIN_EMAILS not set; admin dashboard is closed to everyone");
        }

        let google = GoogleConfig::from_values(
            non_empty(lookup("GOOGLE_CLIENT_ID")),
            non_empty(lookup("GOOGLE_CLIENT_SECRET")),
            non_empty(lookup("GOOGLE_REDIRECT_URI")),
        );

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue { key: "COOKIE_SECURE", value: raw })?,
            None => google
                .as_ref()
                .is_some_and(|g| g.redirect_uri.starts_with("https://")),
        };

        let assets_dir = lookup("ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"));

        Ok(Self {
            port,
            firebase,
            endpoints,
            collection,
            admin,
            cookie_secure,
            google,
            http_timeout_secs,
            assets_dir,
        })
    }
}

/// Resolve REST base URLs, pointing at local emulators when their hosts are set.
#[must_use]
pub fn endpoints_from(auth_emulator: Option<&str>, firestore_emulator: Option<&str>) -> FirebaseEndpoints {
    let mut endpoints = FirebaseEndpoints::default();
    if let Some(host) = auth_emulator {
        endpoints.identity_toolkit = format!("http://{host}/identitytoolkit.googleapis.com");
        endpoints.secure_token = format!("http://{host}/securetoken.googleapis.com");
    }
    if let Some(host) = firestore_emulator {
        endpoints.firestore = format!("http://{host}");
    }
    endpoints
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match non_empty(raw) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn firebase_value<F>(lookup: &F, key: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key)).unwrap_or_else(|| {
        warn!(key, "firebase setting missing; provider calls will likely fail");
        String::new()
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! The identity provider and document store are built once in `main` and
//! passed in here behind their traits; nothing reaches for a global client.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::identity::IdentityProvider;
use crate::services::session::SessionStore;
use crate::services::store::DocumentStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn DocumentStore>,
    pub sessions: SessionStore,
    /// Plain HTTP client for calls outside the Firebase clients (Google OAuth).
    pub http: reqwest::Client,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: AppConfig,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        http: reqwest::Client,
    ) -> Self {
        Self { config: Arc::new(config), identity, store, sessions: SessionStore::new(), http }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::services::identity::{AuthError, Identity, SignedIn, TokenSet};
    use crate::services::store::{Document, StoreError};

    pub const ADMIN_EMAIL: &str = "dean@uni.edu";
    pub const GOOGLE_TOKEN: &str = "good-google-token";

    /// Config with `dean@uni.edu` as the only admin and no Google sign-in.
    #[must_use]
    pub fn test_config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "ADMIN_EMAILS" => Some(ADMIN_EMAIL.to_owned()),
            "FIREBASE_PROJECT_ID" => Some("demo".to_owned()),
            _ => None,
        })
        .expect("test config should parse")
    }

    /// A sign-in result for `email` whose ID token lives for `ttl`.
    #[must_use]
    pub fn signed_in(email: &str, ttl: Duration) -> SignedIn {
        SignedIn {
            identity: Identity {
                uid: format!("uid-{email}"),
                email: Some(email.to_owned()),
                display_name: None,
                photo_url: None,
            },
            tokens: TokenSet::new(format!("id-{email}"), format!("refresh-{email}"), ttl),
        }
    }

    // -------------------------------------------------------------------------
    // MemoryStore
    // -------------------------------------------------------------------------

    /// In-memory `DocumentStore`. Flip `failing` to simulate outages.
    #[derive(Default)]
    pub struct MemoryStore {
        pub documents: Mutex<Vec<Document>>,
        pub failing: AtomicBool,
        pub bearers: Mutex<Vec<String>>,
    }

    impl MemoryStore {
        #[must_use]
        pub fn with_documents(documents: Vec<Document>) -> Self {
            Self { documents: Mutex::new(documents), ..Self::default() }
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self, bearer: &str) -> Result<(), StoreError> {
            self.bearers
                .lock()
                .expect("bearers mutex")
                .push(bearer.to_owned());
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Response { status: 503, body: "unavailable".into() });
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl DocumentStore for MemoryStore {
        async fn get_document(&self, _collection: &str, id: &str, bearer: &str) -> Result<Option<Document>, StoreError> {
            self.check(bearer)?;
            let documents = self.documents.lock().expect("documents mutex");
            Ok(documents.iter().find(|d| d.id == id).cloned())
        }

        async fn list_documents(&self, _collection: &str, bearer: &str) -> Result<Vec<Document>, StoreError> {
            self.check(bearer)?;
            Ok(self.documents.lock().expect("documents mutex").clone())
        }
    }

    // -------------------------------------------------------------------------
    // MockIdentity
    // -------------------------------------------------------------------------

    /// In-memory `IdentityProvider` with email/password accounts.
    pub struct MockIdentity {
        pub accounts: Mutex<HashMap<String, String>>,
        pub refresh_ok: AtomicBool,
        pub refresh_calls: AtomicUsize,
        pub ttl: Duration,
    }

    impl Default for MockIdentity {
        fn default() -> Self {
            Self {
                accounts: Mutex::new(HashMap::new()),
                refresh_ok: AtomicBool::new(true),
                refresh_calls: AtomicUsize::new(0),
                ttl: Duration::from_secs(3600),
            }
        }
    }

    impl MockIdentity {
        #[must_use]
        pub fn with_account(self, email: &str, password: &str) -> Self {
            self.accounts
                .lock()
                .expect("accounts mutex")
                .insert(email.to_owned(), password.to_owned());
            self
        }

        fn rejected(code: &str) -> AuthError {
            AuthError::Rejected { code: code.to_owned() }
        }
    }

    #[async_trait::async_trait]
    impl IdentityProvider for MockIdentity {
        async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
            let accounts = self.accounts.lock().expect("accounts mutex");
            match accounts.get(email) {
                Some(stored) if stored == password => Ok(signed_in(email, self.ttl)),
                _ => Err(Self::rejected("INVALID_LOGIN_CREDENTIALS")),
            }
        }

        async fn sign_up(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
            let mut accounts = self.accounts.lock().expect("accounts mutex");
            if accounts.contains_key(email) {
                return Err(Self::rejected("EMAIL_EXISTS"));
            }
            if password.len() < 6 {
                return Err(Self::rejected("WEAK_PASSWORD"));
            }
            accounts.insert(email.to_owned(), password.to_owned());
            Ok(signed_in(email, self.ttl))
        }

        async fn sign_in_with_google(&self, google_id_token: &str, _request_uri: &str) -> Result<SignedIn, AuthError> {
            if google_id_token == GOOGLE_TOKEN {
                Ok(signed_in("grace@uni.edu", self.ttl))
            } else {
                Err(Self::rejected("INVALID_IDP_RESPONSE"))
            }
        }

        async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, AuthError> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            if self.refresh_ok.load(Ordering::SeqCst) {
                Ok(TokenSet::new(format!("{refresh_token}-fresh"), refresh_token.to_owned(), Duration::from_secs(3600)))
            } else {
                Err(Self::rejected("TOKEN_EXPIRED"))
            }
        }
    }

    /// State wired to fresh in-memory fakes.
    #[must_use]
    pub fn test_app_state() -> AppState {
        test_app_state_with(Arc::new(MockIdentity::default()), Arc::new(MemoryStore::default()))
    }

    #[must_use]
    pub fn test_app_state_with(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> AppState {
        AppState::new(test_config(), identity, store, reqwest::Client::new())
    }

    /// Serve the full router on an ephemeral port; returns its base URL.
    pub async fn spawn_app(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let app = crate::routes::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });
        format!("http://{addr}")
    }

    /// HTTP client that reports redirects instead of following them.
    #[must_use]
    pub fn test_client() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("test client")
    }

    /// Start a session directly and return the cookie header value for it.
    pub async fn session_cookie(state: &AppState, email: &str) -> String {
        let token = state.sessions.create(signed_in(email, Duration::from_secs(3600))).await;
        format!("session_token={token}")
    }
}

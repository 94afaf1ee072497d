//! Session table and auth-state subscriptions.
//!
//! ARCHITECTURE
//! ============
//! Each session owns a `watch` channel carrying the current identity, or
//! `None` once signed out. Views subscribe on entry and drop the
//! subscription on exit; the SSE endpoint keeps one open for the life of
//! the stream. Sign-out publishes `None`, then drops the sender, so every
//! subscriber sees the final value and then end-of-stream.
//!
//! TRADE-OFFS
//! ==========
//! Sessions live in memory only. A restart signs everyone out, which keeps
//! provider refresh tokens off disk. Each session also has a fixed lifetime
//! from sign-in; expired entries are evicted when touched, pruned on
//! `create`, and swept periodically by `spawn_sweeper`.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::Stream;
use rand::Rng;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::identity::{Identity, IdentityProvider, SignedIn, TokenSet};

/// How long a session lasts after sign-in, regardless of token refreshes.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Interval between background sweeps of expired sessions.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// A live view of one session's auth state. Dropping it unsubscribes.
pub struct AuthSubscription {
    rx: watch::Receiver<Option<Identity>>,
}

impl AuthSubscription {
    /// A subscription that is already signed out and closed.
    #[must_use]
    pub fn signed_out() -> Self {
        let (_tx, rx) = watch::channel(None);
        Self { rx }
    }

    /// The most recent value.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. `None` once the session is gone.
    pub async fn next(&mut self) -> Option<Option<Identity>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Current value first, then every change, ending at sign-out.
    pub fn into_stream(self) -> impl Stream<Item = Option<Identity>> + Send + 'static {
        futures::stream::unfold((self, true), |(mut sub, first)| async move {
            if first {
                let value = sub.rx.borrow_and_update().clone();
                return Some((value, (sub, false)));
            }
            let value = sub.next().await?;
            Some((value, (sub, false)))
        })
    }

    /// Explicitly end the subscription.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

// =============================================================================
// STORE
// =============================================================================

struct SessionEntry {
    tokens: TokenSet,
    auth: watch::Sender<Option<Identity>>,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Publish the final signed-out value. Subscribers see end-of-stream
    /// once the entry is dropped.
    fn close(&self) {
        self.auth.send_replace(None);
    }
}

/// In-memory session table keyed by the cookie token.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { sessions: Arc::default(), ttl }
    }

    /// Lifetime given to new sessions.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session for a successful sign-in, returning its token.
    /// Expired sessions are pruned first.
    pub async fn create(&self, signed_in: SignedIn) -> String {
        let token = generate_token();
        let now = Instant::now();
        let (auth, _) = watch::channel(Some(signed_in.identity));
        let entry = SessionEntry { tokens: signed_in.tokens, auth, expires_at: now + self.ttl };

        let mut sessions = self.sessions.write().await;
        let pruned = prune(&mut sessions, now);
        sessions.insert(token.clone(), entry);
        info!(pruned, "session created");
        token
    }

    /// Subscribe to a session's auth state. Unknown, missing or expired
    /// tokens get a closed, signed-out subscription.
    pub async fn subscribe(&self, token: Option<&str>) -> AuthSubscription {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return AuthSubscription::signed_out();
        };
        let expired = match self.sessions.read().await.get(token) {
            Some(entry) if !entry.is_expired(Instant::now()) => {
                return AuthSubscription { rx: entry.auth.subscribe() };
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.evict_expired(token).await;
        }
        AuthSubscription::signed_out()
    }

    /// End a session: publish `None` to subscribers and forget it.
    /// Returns whether the session existed.
    pub async fn sign_out(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);
        match removed {
            Some(entry) => {
                entry.close();
                info!(subscribers = entry.auth.receiver_count(), "session signed out");
                true
            }
            None => false,
        }
    }

    /// Current ID token for store calls, refreshed first if it expired.
    /// A failed refresh, or an expired session, signs out and yields `None`.
    pub async fn bearer_token(&self, token: &str, provider: &dyn IdentityProvider) -> Option<String> {
        let refresh_token = {
            let sessions = self.sessions.read().await;
            let entry = sessions.get(token)?;
            let now = Instant::now();
            if entry.is_expired(now) {
                None
            } else if !entry.tokens.is_expired(now) {
                return Some(entry.tokens.id_token.clone());
            } else {
                Some(entry.tokens.refresh_token.clone())
            }
        };
        let Some(refresh_token) = refresh_token else {
            self.evict_expired(token).await;
            return None;
        };

        debug!("session token expired; refreshing");
        match provider.refresh(&refresh_token).await {
            Ok(tokens) => {
                let id_token = tokens.id_token.clone();
                let mut sessions = self.sessions.write().await;
                let entry = sessions.get_mut(token)?;
                entry.tokens = tokens;
                Some(id_token)
            }
            Err(e) => {
                warn!(error = %e, "session refresh failed; signing out");
                self.sign_out(token).await;
                None
            }
        }
    }

    /// Remove `token` if it is still present and expired.
    async fn evict_expired(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(token)
            .is_some_and(|entry| entry.is_expired(Instant::now()))
        {
            if let Some(entry) = sessions.remove(token) {
                entry.close();
                info!("expired session evicted");
            }
        }
    }

    /// Remove every expired session, returning how many were dropped.
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        prune(&mut sessions, Instant::now())
    }

    /// Number of live subscriptions on a session.
    #[cfg(test)]
    pub async fn subscriber_count(&self, token: &str) -> usize {
        self.sessions
            .read()
            .await
            .get(token)
            .map_or(0, |entry| entry.auth.receiver_count())
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn prune(sessions: &mut HashMap<String, SessionEntry>, now: Instant) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| {
        if entry.is_expired(now) {
            entry.close();
            false
        } else {
            true
        }
    });
    before - sessions.len()
}

/// Spawn a background task that sweeps expired sessions every `period`.
pub fn spawn_sweeper(store: SessionStore, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs(), "session sweeper configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let swept = store.sweep_expired().await;
            if swept > 0 {
                debug!(swept, "expired sessions swept");
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

//! Access decisions for protected views.
//!
//! A guard looks at one auth-state value and either lets the request
//! proceed with that identity or denies it. Denials never surface as
//! errors to the user; page routes turn them into a redirect to the login
//! view, JSON routes into 401/403.

use super::identity::Identity;

pub const LOGIN_PATH: &str = "/login";

// =============================================================================
// ADMIN POLICY
// =============================================================================

/// Allow-list of admin emails, compared trimmed and case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPolicy {
    emails: Vec<String>,
}

impl AdminPolicy {
    #[must_use]
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut emails: Vec<String> = emails
            .into_iter()
            .map(|e| e.as_ref().trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        emails.sort();
        emails.dedup();
        Self { emails }
    }

    /// Parse a comma-separated list, e.g. the `ADMIN_EMAILS` variable.
    #[must_use]
    pub fn from_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    #[must_use]
    pub fn allows(&self, email: &str) -> bool {
        let email = email.trim().to_ascii_lowercase();
        self.emails.binary_search(&email).is_ok()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

// =============================================================================
// GUARD
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No identity on the session.
    SignedOut,
    /// Signed in, but not permitted by the view's policy.
    NotAllowed,
}

impl Denial {
    /// Where a denied page request is sent. Every denial goes to login.
    #[must_use]
    pub fn redirect_target(self) -> &'static str {
        LOGIN_PATH
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed(Identity),
    Deny(Denial),
}

#[derive(Debug, Clone, Copy)]
pub enum SessionGuard<'a> {
    /// Any signed-in identity.
    SignedIn,
    /// Signed-in identity whose email is on the allow-list.
    Admin(&'a AdminPolicy),
}

impl SessionGuard<'_> {
    #[must_use]
    pub fn check(&self, identity: Option<Identity>) -> GuardOutcome {
        let Some(identity) = identity else {
            return GuardOutcome::Deny(Denial::SignedOut);
        };
        match self {
            Self::SignedIn => GuardOutcome::Proceed(identity),
            Self::Admin(policy) => {
                let allowed = identity
                    .email
                    .as_deref()
                    .is_some_and(|email| policy.allows(email));
                if allowed {
                    GuardOutcome::Proceed(identity)
                } else {
                    GuardOutcome::Deny(Denial::NotAllowed)
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

//! Auth routes: sign-in flows, sign-out and the auth-state API.

use std::convert::Infallible;

use axum::extract::{Form, FromRef, FromRequestParts, Query, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use time::Duration;
use tracing::{debug, info, warn};

use crate::services::google;
use crate::services::guard::{Denial, GuardOutcome, SessionGuard};
use crate::services::identity::{AuthError, Identity, SignedIn};
use crate::services::session;
use crate::state::AppState;
use crate::views::dashboard::DASHBOARD_PATH;
use crate::views::login::{LoginForm, LoginMode, login_page as render_login};

pub const COOKIE_NAME: &str = "session_token";
pub const OAUTH_STATE_COOKIE_NAME: &str = "oauth_state";

fn cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = cookie(name, String::new(), secure);
    cookie.set_max_age(Duration::ZERO);
    cookie
}

fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(COOKIE_NAME)
        .map(Cookie::value)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// AUTH EXTRACTORS
// =============================================================================

/// The caller's auth state, signed in or not. Never rejects.
pub struct AuthState {
    pub token: Option<String>,
    pub identity: Option<Identity>,
}

impl<S> FromRequestParts<S> for AuthState
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let token = session_token(&CookieJar::from_headers(&parts.headers));
        let subscription = app_state.sessions.subscribe(token.as_deref()).await;
        let identity = subscription.current();
        subscription.unsubscribe();
        Ok(Self { token, identity })
    }
}

/// Denied guard check. Pages redirect to the login view; `/api/` answers
/// with a bare status.
#[derive(Debug)]
pub struct AuthRejection {
    denial: Denial,
    api: bool,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        if self.api {
            let status = match self.denial {
                Denial::SignedOut => StatusCode::UNAUTHORIZED,
                Denial::NotAllowed => StatusCode::FORBIDDEN,
            };
            return status.into_response();
        }
        Redirect::temporary(self.denial.redirect_target()).into_response()
    }
}

/// Signed-in user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub identity: Identity,
    pub token: String,
    /// Live ID token for document store calls.
    pub bearer: String,
}

/// Signed-in user on the admin allow-list.
pub struct AdminUser(pub AuthUser);

async fn authorize(parts: &Parts, app_state: &AppState, guard: SessionGuard<'_>) -> Result<AuthUser, AuthRejection> {
    let api = parts.uri.path().starts_with("/api/");
    let deny = |denial| {
        debug!(path = %parts.uri.path(), ?denial, "guard denied request");
        AuthRejection { denial, api }
    };

    let Some(token) = session_token(&CookieJar::from_headers(&parts.headers)) else {
        return Err(deny(Denial::SignedOut));
    };

    // Refresh first: a failed refresh signs the session out before the check.
    let bearer = app_state
        .sessions
        .bearer_token(&token, app_state.identity.as_ref())
        .await;
    let subscription = app_state.sessions.subscribe(Some(&token)).await;
    let outcome = guard.check(subscription.current());
    subscription.unsubscribe();

    match (outcome, bearer) {
        (GuardOutcome::Proceed(identity), Some(bearer)) => Ok(AuthUser { identity, token, bearer }),
        (GuardOutcome::Proceed(_), None) => Err(deny(Denial::SignedOut)),
        (GuardOutcome::Deny(denial), _) => Err(deny(denial)),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        authorize(parts, &app_state, SessionGuard::SignedIn).await
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        authorize(parts, &app_state, SessionGuard::Admin(&app_state.config.admin))
            .await
            .map(Self)
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Deserialize)]
pub struct LoginQuery {
    mode: Option<String>,
}

/// `GET /login`: sign-in or sign-up form. Signed-in callers go to the dashboard.
pub async fn login_page(State(state): State<AppState>, auth: AuthState, Query(query): Query<LoginQuery>) -> Response {
    if auth.identity.is_some() {
        return Redirect::temporary(DASHBOARD_PATH).into_response();
    }
    render_login(LoginForm {
        mode: LoginMode::parse(query.mode.as_deref()),
        google_enabled: state.config.google.is_some(),
        ..LoginForm::default()
    })
    .into_response()
}

#[derive(Deserialize)]
pub struct LoginSubmission {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    mode: Option<String>,
}

/// `POST /login`: sign in or sign up, then start a session.
pub async fn login_submit(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginSubmission>) -> Response {
    let mode = LoginMode::parse(form.mode.as_deref());
    let email = form.email.trim().to_owned();

    if email.is_empty() || form.password.is_empty() {
        return render_login(LoginForm {
            mode,
            email,
            error: Some("Enter your email and password.".to_owned()),
            google_enabled: state.config.google.is_some(),
        })
        .into_response();
    }

    let result = match mode {
        LoginMode::SignIn => state.identity.sign_in_with_password(&email, &form.password).await,
        LoginMode::SignUp => state.identity.sign_up(&email, &form.password).await,
    };

    match result {
        Ok(signed_in) => start_session(&state, jar, signed_in).await,
        Err(e) => {
            warn!(error = %e, mode = mode.as_str(), "email sign-in failed");
            render_login(LoginForm {
                mode,
                email,
                error: Some(e.user_message()),
                google_enabled: state.config.google.is_some(),
            })
            .into_response()
        }
    }
}

/// Create a session, set the cookie, and send the user to their dashboard.
async fn start_session(state: &AppState, jar: CookieJar, signed_in: SignedIn) -> Response {
    let uid = signed_in.identity.uid.clone();
    let token = state.sessions.create(signed_in).await;
    info!(%uid, "user signed in");

    let secure = state.config.cookie_secure;
    let had_oauth_state = jar.get(OAUTH_STATE_COOKIE_NAME).is_some();
    let mut session_cookie = cookie(COOKIE_NAME, token, secure);
    if let Ok(max_age) = Duration::try_from(state.sessions.ttl()) {
        session_cookie.set_max_age(max_age);
    }
    let mut jar = jar.add(session_cookie);
    if had_oauth_state {
        jar = jar.add(expired_cookie(OAUTH_STATE_COOKIE_NAME, secure));
    }
    (jar, Redirect::to(DASHBOARD_PATH)).into_response()
}

/// `POST /logout`: end the session, clear the cookie, go home.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(token) = session_token(&jar) {
        state.sessions.sign_out(&token).await;
    }
    let jar = jar.add(expired_cookie(COOKIE_NAME, state.config.cookie_secure));
    (jar, Redirect::to("/"))
}

// =============================================================================
// GOOGLE
// =============================================================================

/// `GET /auth/google`: redirect to Google's consent screen.
pub async fn google_redirect(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(config) = &state.config.google else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Google sign-in not configured").into_response();
    };

    let oauth_state = session::generate_token();
    let url = match config.authorize_url(&oauth_state) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "google authorize url build failed");
            return google_failure(&state, jar, &e);
        }
    };

    let mut state_cookie = cookie(OAUTH_STATE_COOKIE_NAME, oauth_state, state.config.cookie_secure);
    state_cookie.set_max_age(Duration::minutes(10));
    (jar.add(state_cookie), Redirect::temporary(&url)).into_response()
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// `GET /auth/google/callback`: verify state, exchange the code, start a session.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let Some(config) = &state.config.google else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Google sign-in not configured").into_response();
    };

    if let Some(error) = params.error {
        let err = if error == "access_denied" { AuthError::Cancelled } else { AuthError::Rejected { code: error } };
        info!(error = %err, "google consent not granted");
        return google_failure(&state, jar, &err);
    }

    let expected_state = jar
        .get(OAUTH_STATE_COOKIE_NAME)
        .map(Cookie::value)
        .unwrap_or_default();
    let state_ok = params
        .state
        .as_deref()
        .is_some_and(|s| !expected_state.is_empty() && s == expected_state);
    let Some(code) = params.code.filter(|_| state_ok) else {
        warn!("google callback with invalid oauth state");
        return google_failure(&state, jar, &AuthError::InvalidState);
    };

    let google_id_token = match google::exchange_code(&state.http, config, &code).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "google code exchange failed");
            return google_failure(&state, jar, &e);
        }
    };

    match state
        .identity
        .sign_in_with_google(&google_id_token, &config.redirect_uri)
        .await
    {
        Ok(signed_in) => start_session(&state, jar, signed_in).await,
        Err(e) => {
            tracing::error!(error = %e, "google sign-in with identity provider failed");
            google_failure(&state, jar, &e)
        }
    }
}

fn google_failure(state: &AppState, jar: CookieJar, err: &AuthError) -> Response {
    let jar = jar.add(expired_cookie(OAUTH_STATE_COOKIE_NAME, state.config.cookie_secure));
    let page = render_login(LoginForm {
        error: Some(err.user_message()),
        google_enabled: state.config.google.is_some(),
        ..LoginForm::default()
    });
    (jar, page).into_response()
}

// =============================================================================
// AUTH STATE API
// =============================================================================

/// `GET /api/auth/me`: return the current identity.
pub async fn me(auth: AuthUser) -> Json<Identity> {
    Json(auth.identity)
}

fn auth_event(identity: Option<&Identity>) -> Event {
    let payload = serde_json::json!({
        "signed_in": identity.is_some(),
        "email": identity.and_then(|i| i.email.as_deref()),
    });
    Event::default().event("auth").data(payload.to_string())
}

/// `GET /api/auth/events`: stream auth-state changes for this session.
/// The stream ends once the session signs out.
pub async fn events(
    State(state): State<AppState>,
    auth: AuthState,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.sessions.subscribe(auth.token.as_deref()).await;
    let stream = subscription
        .into_stream()
        .map(|identity| Ok(auth_event(identity.as_ref())));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

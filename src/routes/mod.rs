//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages and JSON endpoints share one Axum router. Pages render through
//! `crate::views`; the stylesheet is served from `/assets`.

pub mod admin;
pub mod auth;
pub mod dashboard;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::views;

pub fn app(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir);

    Router::new()
        .route("/", get(home))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .route("/auth/google", get(auth::google_redirect))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/admin-dashboard", get(admin::admin_dashboard))
        .route("/admin-dashboard/export.csv", get(admin::export_csv))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/events", get(auth::events))
        .route("/api/contributions/me", get(dashboard::my_contributions))
        .route("/api/contributions", get(admin::all_contributions))
        .route("/healthz", get(healthz))
        .nest_service("/assets", assets)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /`: landing page.
async fn home(auth: auth::AuthState) -> Html<String> {
    views::home::home_page(auth.identity.is_some())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

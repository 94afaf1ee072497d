//! Dashboard routes: the caller's own contribution record.

use axum::extract::{Query, State};
use axum::response::{Html, Json};
use serde::Deserialize;

use super::auth::AuthUser;
use crate::record::{ContributionRecord, Tab};
use crate::services::records::RecordFetcher;
use crate::state::AppState;
use crate::views;

#[derive(Deserialize)]
pub struct DashboardQuery {
    tab: Option<String>,
}

async fn own_record(state: &AppState, auth: &AuthUser) -> Option<ContributionRecord> {
    let email = auth.identity.email.as_deref()?;
    RecordFetcher::new(state.store.as_ref(), &state.config.collection)
        .fetch_record(email, &auth.bearer)
        .await
}

/// `GET /dashboard`: overview or one kind's full list.
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let tab = Tab::parse(query.tab.as_deref());
    let record = own_record(&state, &auth).await;
    views::dashboard::dashboard_page(auth.identity.greeting_name(), tab, record)
}

/// `GET /api/contributions/me`: the caller's record, or `null`.
pub async fn my_contributions(State(state): State<AppState>, auth: AuthUser) -> Json<Option<ContributionRecord>> {
    Json(own_record(&state, &auth).await)
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

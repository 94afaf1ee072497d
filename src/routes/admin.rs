//! Admin routes: the full record set for allow-listed users.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{Html, IntoResponse, Json};
use tracing::info;

use super::auth::AdminUser;
use crate::record::ContributionRecord;
use crate::services::export;
use crate::services::records::RecordFetcher;
use crate::state::AppState;
use crate::views;

async fn all_records(state: &AppState, admin: &AdminUser) -> Vec<ContributionRecord> {
    RecordFetcher::new(state.store.as_ref(), &state.config.collection)
        .list_records(&admin.0.bearer)
        .await
}

/// `GET /admin-dashboard`: table of all records.
pub async fn admin_dashboard(State(state): State<AppState>, admin: AdminUser) -> Html<String> {
    views::admin::admin_page(all_records(&state, &admin).await)
}

/// `GET /api/contributions`: all records as JSON.
pub async fn all_contributions(State(state): State<AppState>, admin: AdminUser) -> Json<Vec<ContributionRecord>> {
    Json(all_records(&state, &admin).await)
}

/// `GET /admin-dashboard/export.csv`: all records as a CSV attachment.
pub async fn export_csv(State(state): State<AppState>, admin: AdminUser) -> impl IntoResponse {
    let records = all_records(&state, &admin).await;
    info!(rows = records.len(), "exporting contributions csv");
    (
        [
            (CONTENT_TYPE, export::CSV_CONTENT_TYPE.to_owned()),
            (CONTENT_DISPOSITION, export::content_disposition()),
        ],
        export::to_csv(&records),
    )
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;

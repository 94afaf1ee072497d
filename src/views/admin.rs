//! Admin dashboard: every record in one table.

use axum::response::Html;
use leptos::prelude::*;

use super::{auth_listener, render_page};
use crate::record::{ContributionKind, ContributionRecord};

pub const EXPORT_PATH: &str = "/admin-dashboard/export.csv";

/// Placeholder for a kind with no entries.
pub const EMPTY_CELL: &str = "—";

fn cell(entries: &[String]) -> AnyView {
    if entries.is_empty() {
        return view! { <td class="records__cell records__cell--empty">{EMPTY_CELL}</td> }.into_any();
    }
    let lines = entries
        .iter()
        .map(|entry| view! { <div class="records__entry">{entry.clone()}</div> })
        .collect_view();
    view! { <td class="records__cell">{lines}</td> }.into_any()
}

fn row(record: &ContributionRecord) -> AnyView {
    let cells = ContributionKind::ALL
        .into_iter()
        .map(|kind| cell(record.entries(kind)))
        .collect_view();
    view! {
        <tr>
            <td class="records__cell records__cell--email">{record.email.clone()}</td>
            {cells}
        </tr>
    }
    .into_any()
}

fn records_table(records: &[ContributionRecord]) -> AnyView {
    if records.is_empty() {
        return view! { <p class="records__empty">"No contributions found."</p> }.into_any();
    }
    let headings = ContributionKind::ALL
        .into_iter()
        .map(|kind| view! { <th>{kind.label()}</th> })
        .collect_view();
    let rows = records.iter().map(row).collect_view();
    view! {
        <table class="records">
            <thead>
                <tr>
                    <th>"Email"</th>
                    {headings}
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
    .into_any()
}

pub fn admin_page(records: Vec<ContributionRecord>) -> Html<String> {
    render_page("Admin", true, move || {
        view! {
            <section class="admin-header">
                <h1>"All contributions"</h1>
                <a class="button" href=EXPORT_PATH>"Export CSV"</a>
            </section>
            {records_table(&records)}
            {auth_listener()}
        }
    })
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;

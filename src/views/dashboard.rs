//! User dashboard: welcome banner, tab strip, and the selected tab.

use axum::response::Html;
use leptos::prelude::*;

use super::{auth_listener, render_page};
use crate::record::{ContributionKind, ContributionRecord, Preview, Tab};

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Link to `tab` on the dashboard. The overview has no query.
#[must_use]
pub fn tab_href(tab: Tab) -> String {
    match tab {
        Tab::Overview => DASHBOARD_PATH.to_owned(),
        Tab::Kind(kind) => format!("{DASHBOARD_PATH}?tab={}", kind.field()),
    }
}

#[must_use]
pub fn view_all_label(kind: ContributionKind, remaining: usize) -> String {
    format!("View all {} ({remaining} more)", kind.field())
}

#[must_use]
pub fn empty_kind_message(kind: ContributionKind) -> String {
    format!("No {} information available", kind.singular())
}

fn entry_list(entries: Vec<String>) -> impl IntoView {
    let items = entries
        .into_iter()
        .map(|entry| view! { <li class="entries__item">{entry}</li> })
        .collect_view();
    view! { <ul class="entries">{items}</ul> }
}

fn kind_section(kind: ContributionKind, body: AnyView) -> impl IntoView {
    view! {
        <section class="kind" id=kind.field()>
            <h2 class="kind__title">{kind.label()}</h2>
            {body}
        </section>
    }
}

fn overview(record: &ContributionRecord) -> AnyView {
    ContributionKind::ALL
        .into_iter()
        .map(|kind| {
            let preview = Preview::of(record.entries(kind));
            let body = if preview.shown.is_empty() {
                view! { <p class="kind__empty">{empty_kind_message(kind)}</p> }.into_any()
            } else {
                let more = preview.has_more().then(|| {
                    view! {
                        <a class="kind__more" href=tab_href(Tab::Kind(kind))>
                            {view_all_label(kind, preview.remaining)}
                        </a>
                    }
                });
                view! {
                    <div class="kind__body">
                        {entry_list(preview.shown.to_vec())}
                        {more}
                    </div>
                }
                .into_any()
            };
            kind_section(kind, body)
        })
        .collect_view()
        .into_any()
}

fn detail(record: &ContributionRecord, kind: ContributionKind) -> AnyView {
    let entries = record.entries(kind);
    let body = if entries.is_empty() {
        view! { <p class="kind__empty">{empty_kind_message(kind)}</p> }.into_any()
    } else {
        entry_list(entries.to_vec()).into_any()
    };
    kind_section(kind, body).into_any()
}

fn no_record() -> AnyView {
    view! {
        <section class="empty-state">
            <h2>"No contribution data found"</h2>
            <p>
                "We couldn't find any contribution data for your account. Please add some contributions or contact support."
            </p>
        </section>
    }
    .into_any()
}

fn tab_strip(active: Tab) -> impl IntoView {
    let tabs = Tab::ALL
        .into_iter()
        .map(|tab| {
            let class = if tab == active { "tabs__tab tabs__tab--active" } else { "tabs__tab" };
            view! { <a class=class href=tab_href(tab)>{tab.label()}</a> }
        })
        .collect_view();
    view! { <nav class="tabs">{tabs}</nav> }
}

pub fn dashboard_page(name: &str, tab: Tab, record: Option<ContributionRecord>) -> Html<String> {
    let welcome = format!("Welcome back, {name}!");
    render_page("Dashboard", true, move || {
        let content = match (&record, tab) {
            (None, _) => no_record(),
            (Some(record), Tab::Overview) => overview(record),
            (Some(record), Tab::Kind(kind)) => detail(record, kind),
        };

        view! {
            <section class="welcome">
                <h1>{welcome}</h1>
                <a class="welcome__refresh" href=tab_href(tab)>"Refresh"</a>
            </section>
            {tab_strip(tab)}
            <div class="tab-panel">{content}</div>
            {auth_listener()}
        }
    })
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

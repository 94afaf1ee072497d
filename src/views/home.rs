//! Landing page.

use axum::response::Html;
use leptos::prelude::*;

use super::render_page;
use crate::record::ContributionKind;

fn blurb(kind: ContributionKind) -> &'static str {
    match kind {
        ContributionKind::Patents => "Granted and pending patents, one per line.",
        ContributionKind::Publications => "Journal articles, papers and book chapters.",
        ContributionKind::Conferences => "Talks given and conferences attended.",
        ContributionKind::Events => "Workshops, hackathons and outreach events.",
    }
}

pub fn home_page(signed_in: bool) -> Html<String> {
    render_page("Home", signed_in, move || {
        let cards = ContributionKind::ALL
            .into_iter()
            .map(|kind| {
                view! {
                    <article class="card">
                        <h2 class="card__title">{kind.label()}</h2>
                        <p class="card__body">{blurb(kind)}</p>
                    </article>
                }
            })
            .collect_view();

        let cta = if signed_in {
            view! { <a class="button" href="/dashboard">"Go to your dashboard"</a> }.into_any()
        } else {
            view! { <a class="button" href="/login">"Get started"</a> }.into_any()
        };

        view! {
            <section class="hero">
                <h1>"Track your academic contributions"</h1>
                <p class="hero__lead">
                    "Patents, publications, conferences and events in one place."
                </p>
                {cta}
            </section>
            <section class="cards">{cards}</section>
        }
    })
}

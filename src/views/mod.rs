//! Server-rendered pages.
//!
//! ARCHITECTURE
//! ============
//! Every page is a Leptos view rendered to a string inside a fresh reactive
//! owner and wrapped in the shared document shell. There is no hydration;
//! the only script is the auth-event listener on guarded pages.

pub mod admin;
pub mod dashboard;
pub mod home;
pub mod login;

use axum::response::Html;
use leptos::prelude::*;

pub const STYLESHEET_PATH: &str = "/assets/app.css";

/// Navigates to the login view once the session's auth stream reports
/// signed-out.
const AUTH_LISTENER: &str = "var s=new EventSource('/api/auth/events');\
s.addEventListener('auth',function(e){if(!JSON.parse(e.data).signed_in){s.close();window.location.assign('/login');}});";

/// Render `body` inside the document shell.
pub fn render_page<F, V>(title: &str, signed_in: bool, body: F) -> Html<String>
where
    F: FnOnce() -> V,
    V: IntoView + 'static,
{
    let title = format!("{title} | Contribution Tracker");
    let html = Owner::new().with(move || {
        view! {
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                    <title>{title}</title>
                    <link rel="stylesheet" href=STYLESHEET_PATH/>
                </head>
                <body>
                    <SiteNav signed_in=signed_in/>
                    <main class="page">{body()}</main>
                </body>
            </html>
        }
        .to_html()
    });
    Html(format!("<!DOCTYPE html>{html}"))
}

#[component]
fn SiteNav(signed_in: bool) -> impl IntoView {
    let links = if signed_in {
        view! {
            <a class="site-nav__link" href="/dashboard">"Dashboard"</a>
            <form class="site-nav__logout" method="post" action="/logout">
                <button class="site-nav__button" type="submit">"Log out"</button>
            </form>
        }
        .into_any()
    } else {
        view! { <a class="site-nav__link" href="/login">"Log in"</a> }.into_any()
    };

    view! {
        <header class="site-nav">
            <a class="site-nav__brand" href="/">"Contribution Tracker"</a>
            <nav class="site-nav__links">{links}</nav>
        </header>
    }
}

/// Script tag that follows `/api/auth/events`.
pub fn auth_listener() -> impl IntoView {
    view! { <script inner_html=AUTH_LISTENER></script> }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

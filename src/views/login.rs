//! Login and sign-up form.

use axum::response::Html;
use leptos::prelude::*;

use super::render_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    #[default]
    SignIn,
    SignUp,
}

impl LoginMode {
    /// Parse a `mode` value; anything but `signup` is sign-in.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("signup") => Self::SignUp,
            _ => Self::SignIn,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "signin",
            Self::SignUp => "signup",
        }
    }
}

/// What the login form shows on this render.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub mode: LoginMode,
    pub email: String,
    pub error: Option<String>,
    pub google_enabled: bool,
}

pub fn login_page(form: LoginForm) -> Html<String> {
    let LoginForm { mode, email, error, google_enabled } = form;
    let (heading, submit, toggle_text, toggle_href) = match mode {
        LoginMode::SignIn => ("Sign in", "Sign in", "Need an account? Sign up", "/login?mode=signup"),
        LoginMode::SignUp => ("Create an account", "Sign up", "Already have an account? Sign in", "/login"),
    };

    render_page(heading, false, move || {
        let error = error.map(|message| view! { <p class="login-error" role="alert">{message}</p> });
        let google = google_enabled.then(|| {
            view! {
                <div class="login-divider"></div>
                <a class="button button--google" href="/auth/google">"Continue with Google"</a>
            }
        });

        view! {
            <div class="login-card">
                <h1>{heading}</h1>
                {error}
                <form class="login-form" method="post" action="/login">
                    <input type="hidden" name="mode" value=mode.as_str()/>
                    <label class="login-form__label">
                        "Email"
                        <input class="login-input" type="email" name="email" value=email required=true/>
                    </label>
                    <label class="login-form__label">
                        "Password"
                        <input class="login-input" type="password" name="password" required=true/>
                    </label>
                    <button class="button" type="submit">{submit}</button>
                </form>
                <a class="login-toggle" href=toggle_href>{toggle_text}</a>
                {google}
            </div>
        }
    })
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;

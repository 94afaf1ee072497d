use super::*;

#[test]
fn mode_parse_defaults_to_sign_in() {
    assert_eq!(LoginMode::parse(None), LoginMode::SignIn);
    assert_eq!(LoginMode::parse(Some("bogus")), LoginMode::SignIn);
    assert_eq!(LoginMode::parse(Some("signup")), LoginMode::SignUp);
}

#[test]
fn sign_in_form_links_to_sign_up() {
    let Html(html) = login_page(LoginForm::default());
    assert!(html.contains("action=\"/login\""));
    assert!(html.contains("value=\"signin\""));
    assert!(html.contains("/login?mode=signup"));
    assert!(!html.contains("Continue with Google"));
}

#[test]
fn sign_up_form_posts_signup_mode() {
    let Html(html) = login_page(LoginForm { mode: LoginMode::SignUp, ..LoginForm::default() });
    assert!(html.contains("Create an account"));
    assert!(html.contains("value=\"signup\""));
}

#[test]
fn error_and_email_are_rendered_escaped() {
    let Html(html) = login_page(LoginForm {
        email: "ada@uni.edu".into(),
        error: Some("Bad <input>".into()),
        ..LoginForm::default()
    });
    assert!(html.contains("value=\"ada@uni.edu\""));
    assert!(html.contains("Bad &lt;input&gt;"));
}

#[test]
fn google_link_shown_when_enabled() {
    let Html(html) = login_page(LoginForm { google_enabled: true, ..LoginForm::default() });
    assert!(html.contains("href=\"/auth/google\""));
    assert!(html.contains("Continue with Google"));
}

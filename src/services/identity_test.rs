use super::*;

fn identity(display_name: Option<&str>, email: Option<&str>) -> Identity {
    Identity {
        uid: "uid-1".into(),
        email: email.map(str::to_owned),
        display_name: display_name.map(str::to_owned),
        photo_url: None,
    }
}

#[test]
fn greeting_prefers_display_name() {
    assert_eq!(identity(Some("Ada"), Some("ada@uni.edu")).greeting_name(), "Ada");
}

#[test]
fn greeting_skips_blank_display_name() {
    assert_eq!(identity(Some("  "), Some("ada@uni.edu")).greeting_name(), "ada@uni.edu");
}

#[test]
fn greeting_falls_back_to_user() {
    assert_eq!(identity(None, None).greeting_name(), "User");
}

#[test]
fn token_expires_with_skew() {
    let tokens = TokenSet::new("id".into(), "refresh".into(), Duration::from_secs(60));
    let now = Instant::now();
    assert!(!tokens.is_expired(now));
    assert!(tokens.is_expired(now + Duration::from_secs(31)));
}

#[test]
fn credential_codes_share_one_message() {
    for code in ["EMAIL_NOT_FOUND", "INVALID_PASSWORD", "INVALID_LOGIN_CREDENTIALS"] {
        let err = AuthError::Rejected { code: code.into() };
        assert_eq!(err.user_message(), "Invalid email or password.");
    }
}

#[test]
fn unknown_code_is_named() {
    let err = AuthError::Rejected { code: "QUOTA_EXCEEDED".into() };
    assert_eq!(err.user_message(), "Authentication failed (QUOTA_EXCEEDED).");
}

#[test]
fn cancel_and_transport_messages() {
    assert_eq!(AuthError::Cancelled.user_message(), "Google sign-in was cancelled.");
    let err = AuthError::Response { status: 503, body: String::new() };
    assert!(err.user_message().starts_with("Could not reach"));
}

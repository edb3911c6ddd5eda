use chirp::model::UserStore;

use crate::helpers::{assert_redirect_to, body, TestApp};

#[tokio::test]
async fn signup_form_is_rendered() {
    let app = TestApp::spawn();

    let response = app.get("/signup").await;

    assert_eq!(response.status_code(), 200);
    let html = body(&response);
    assert!(html.contains("<title>Sign up for Twitter</title>"));
    assert!(html.contains(r#"name="user[name]""#));
    assert!(html.contains(r#"name="user[pass]""#));
    assert!(html.contains(r#"name="user[fullname]""#));
}

#[tokio::test]
async fn valid_signup_creates_the_user_and_logs_them_in() {
    let app = TestApp::spawn();

    let response = app.signup("alice", "Alice Liddell", "rabbit-hole").await;

    assert_redirect_to(&response, "/");
    assert!(app.has_session_cookie());

    let user = app.store.get_by_name("alice").await.unwrap().expect("user was not saved");
    assert_eq!(user.fullname, "Alice Liddell");
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(!user.password_hash.contains("rabbit-hole"));

    let home = body(&app.get("/").await);
    assert!(home.contains(r#"<a href="/users/alice">@alice</a>"#));
    assert!(home.contains("Log out"));
}

#[tokio::test]
async fn each_invalid_field_is_reported_back_on_the_form() {
    let long_pass = "p".repeat(1025);
    let cases = [
        (("", "secret", "Alice"), "user name is required"),
        (("abcdefghijklmnop", "secret", "Alice"), "user name must have at most 15 characters"),
        (("alice!", "secret", "Alice"), "user name may only contain letters, numbers and underscores"),
        (("alice", "", "Alice"), "user pass is required"),
        (("alice", "12345", "Alice"), "user pass must have at least 6 characters"),
        (("alice", long_pass.as_str(), "Alice"), "user pass must have at most 1024 characters"),
        (("alice", "secret", ""), "user fullname is required"),
        (("alice", "secret", "Alice Pleasance Liddell"), "user fullname must have at most 20 characters"),
    ];

    for ((name, pass, fullname), message) in cases {
        let app = TestApp::spawn();

        let response = app.signup(name, fullname, pass).await;

        assert_redirect_to(&response, "/signup");
        let html = body(&app.get("/signup").await);
        assert!(html.contains(message), "missing {message:?} in:\n{html}");
        assert!(app.store.get_by_name(name).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn only_the_first_failing_rule_is_reported() {
    let app = TestApp::spawn();

    app.signup("", "", "").await;

    let html = body(&app.get("/signup").await);
    assert!(html.contains("user name is required"));
    assert!(!html.contains("user pass is required"));
    assert!(!html.contains("user fullname is required"));
}

#[tokio::test]
async fn taken_names_are_refused() {
    let app = TestApp::spawn();
    app.seed_user("alice", "Alice Liddell").await;

    let response = app.signup("alice", "Another Alice", "secret1").await;

    assert_redirect_to(&response, "/signup");
    let html = body(&app.get("/signup").await);
    assert!(html.contains("Username already taken!"));
    let user = app.store.get_by_name("alice").await.unwrap().unwrap();
    assert_eq!(user.fullname, "Alice Liddell");
}

#[tokio::test]
async fn flash_messages_are_shown_once() {
    let app = TestApp::spawn();
    app.signup("", "secret", "Alice").await;

    assert!(body(&app.get("/signup").await).contains("user name is required"));
    assert!(!body(&app.get("/signup").await).contains("user name is required"));
    assert!(!app.has_session_cookie());
}

#[tokio::test]
async fn failures_without_a_referer_go_home() {
    let app = TestApp::spawn();

    let response = app
        .post_form("/signup", None, &[("user[pass]", "secret"), ("user[fullname]", "Alice")])
        .await;

    assert_redirect_to(&response, "/");
}

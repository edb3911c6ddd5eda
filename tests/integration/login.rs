use crate::helpers::{assert_redirect_to, body, TestApp};

#[tokio::test]
async fn registered_users_can_log_back_in() {
    let app = TestApp::spawn();
    app.signup("alice", "Alice Liddell", "rabbit-hole").await;
    app.clear_cookies();

    let response = app.login("alice", "rabbit-hole").await;

    assert_redirect_to(&response, "/");
    assert!(body(&app.get("/").await).contains("@alice"));
}

#[tokio::test]
async fn wrong_passwords_and_unknown_names_look_the_same() {
    let app = TestApp::spawn();
    app.signup("alice", "Alice Liddell", "rabbit-hole").await;
    app.clear_cookies();

    for (name, pass) in [("alice", "looking-glass"), ("mallory", "rabbit-hole")] {
        let response = app.login(name, pass).await;

        assert_redirect_to(&response, "/login");
        let html = body(&app.get("/login").await);
        assert!(html.contains("Invalid username or password."));
        assert!(html.contains("Log in"));
    }
}

#[tokio::test]
async fn logging_out_ends_the_session() {
    let app = TestApp::spawn();
    app.signup("alice", "Alice Liddell", "rabbit-hole").await;

    let response = app.post_form("/logout", None, &[]).await;

    assert_redirect_to(&response, "/");
    assert!(!app.has_session_cookie());
    assert!(body(&app.get("/").await).contains("Welcome to Twitter"));
}

#[tokio::test]
async fn tweeting_requires_a_login() {
    let app = TestApp::spawn();

    let response = app.post_form("/tweets", None, &[("tweet[body]", "hello")]).await;

    assert_redirect_to(&response, "/login");
}

#[tokio::test]
async fn tweets_show_up_on_the_timeline() {
    let app = TestApp::spawn();
    app.signup("alice", "Alice Liddell", "rabbit-hole").await;

    let response = app.post_form("/tweets", Some("/"), &[("tweet[body]", "Down the rabbit hole")]).await;

    assert_redirect_to(&response, "/");
    let html = body(&app.get("/").await);
    assert!(html.contains("Down the rabbit hole"));
    assert!(html.contains("a few seconds"));
}

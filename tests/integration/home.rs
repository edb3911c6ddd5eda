use jiff::SignedDuration;

use crate::helpers::{body, TestApp};

#[tokio::test]
async fn anonymous_visitors_see_the_welcome_page() {
    let app = TestApp::spawn();
    let alice = app.seed_user("alice", "Alice Liddell").await;
    app.seed_tweet(Some(&alice), "Down the rabbit hole", SignedDuration::ZERO).await;

    let html = body(&app.get("/").await);

    assert!(html.contains("Welcome to Twitter"));
    assert!(!html.contains("Down the rabbit hole"));
}

#[tokio::test]
async fn timeline_links_every_author_newest_first() {
    let app = TestApp::spawn();
    let alice = app.seed_user("alice", "Alice Liddell").await;
    let carol = app.seed_user("carol", "Carol").await;
    app.seed_tweet(Some(&alice), "first from alice", SignedDuration::from_hours(5)).await;
    app.seed_tweet(Some(&carol), "from carol", SignedDuration::from_hours(3)).await;
    app.seed_tweet(Some(&alice), "second from alice", SignedDuration::from_hours(1)).await;
    app.seed_tweet(None, "from nobody", SignedDuration::from_mins(30)).await;
    app.signup("bob", "Bob", "builder").await;

    let html = body(&app.get("/").await);

    let order: Vec<usize> = ["from nobody", "second from alice", "from carol", "first from alice"]
        .iter()
        .map(|text| html.find(text).unwrap_or_else(|| panic!("{text:?} missing")))
        .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]), "{order:?}");

    assert_eq!(html.matches(r#"<a href="/users/alice">@alice</a>"#).count(), 2);
    assert_eq!(html.matches(r#"<a href="/users/carol">@carol</a>"#).count(), 1);
    assert!(html.contains("an hour"));
    assert!(html.contains("5 hours"));
}

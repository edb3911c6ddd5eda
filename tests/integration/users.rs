use std::sync::Arc;

use async_trait::async_trait;
use chirp::model::{MemoryStore, NewUser, StoreError, User, UserId, UserStore};
use jiff::SignedDuration;

use crate::helpers::{assert_redirect_to, body, TestApp};

/// The in-memory store, except that every follower lookup fails.
struct FollowersDown(Arc<MemoryStore>);

fn backend_down() -> StoreError {
    StoreError::Backend(anyhow::anyhow!("connection reset by peer"))
}

#[async_trait]
impl UserStore for FollowersDown {
    async fn get_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        self.0.get_by_name(name).await
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.0.get_by_id(id).await
    }

    async fn save(&self, user: NewUser) -> Result<User, StoreError> {
        UserStore::save(self.0.as_ref(), user).await
    }

    async fn get_follower_ids(&self, _id: UserId) -> Result<Vec<UserId>, StoreError> {
        Err(backend_down())
    }

    async fn get_following_ids(&self, id: UserId) -> Result<Vec<UserId>, StoreError> {
        self.0.get_following_ids(id).await
    }

    async fn get_followers(&self, _id: UserId) -> Result<Vec<User>, StoreError> {
        Err(backend_down())
    }

    async fn get_followings(&self, id: UserId) -> Result<Vec<User>, StoreError> {
        self.0.get_followings(id).await
    }

    async fn is_following(&self, user_id: UserId, follower_id: UserId) -> Result<bool, StoreError> {
        self.0.is_following(user_id, follower_id).await
    }

    async fn follow(&self, user_id: UserId, follower_id: UserId) -> Result<(), StoreError> {
        self.0.follow(user_id, follower_id).await
    }

    async fn unfollow(&self, user_id: UserId, follower_id: UserId) -> Result<(), StoreError> {
        self.0.unfollow(user_id, follower_id).await
    }
}

#[tokio::test]
async fn unknown_users_get_the_not_found_page() {
    let app = TestApp::spawn();

    for path in ["/users/nobody", "/users/nobody/followers", "/users/nobody/followings"] {
        let response = app.get(path).await;
        assert_eq!(response.status_code(), 404, "{path}");
        assert!(body(&response).contains("Sorry, that page doesn't exist!"));
    }
}

#[tokio::test]
async fn profile_lists_own_tweets_newest_first() {
    let app = TestApp::spawn();
    let alice = app.seed_user("alice", "Alice Liddell").await;
    let bob = app.seed_user("bob", "Bob").await;
    app.seed_tweet(Some(&alice), "older", SignedDuration::from_hours(3)).await;
    app.seed_tweet(Some(&alice), "newer", SignedDuration::from_secs(5)).await;
    app.seed_tweet(Some(&bob), "not alice", SignedDuration::from_secs(5)).await;
    app.seed_tweet(None, "orphan", SignedDuration::from_secs(5)).await;

    let response = app.get("/users/alice").await;

    assert_eq!(response.status_code(), 200);
    let html = body(&response);
    assert!(html.contains("<title>Alice Liddell (@alice)</title>"));
    assert!(html.contains("Tweets <strong>2</strong>"));
    assert!(html.contains("Following <strong>0</strong>"));
    assert!(html.contains("Followers <strong>0</strong>"));

    let newer = html.find("newer").expect("newer tweet missing");
    let older = html.find("older").expect("older tweet missing");
    assert!(newer < older);
    assert!(html.contains("3 hours"));
    assert!(html.contains("a few seconds"));
    assert!(!html.contains("not alice"));
    assert!(!html.contains("orphan"));
}

#[tokio::test]
async fn tweet_bodies_are_escaped() {
    let app = TestApp::spawn();
    let alice = app.seed_user("alice", "Alice Liddell").await;
    app.seed_tweet(Some(&alice), "<script>alert(1)</script>", SignedDuration::ZERO).await;

    let html = body(&app.get("/users/alice").await);

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn anonymous_visitors_get_no_follow_button() {
    let app = TestApp::spawn();
    app.seed_user("alice", "Alice Liddell").await;

    let html = body(&app.get("/users/alice").await);

    assert!(!html.contains("/users/alice/follow\""));
    assert!(!html.contains("/users/alice/unfollow\""));
}

#[tokio::test]
async fn own_profile_has_no_follow_button() {
    let app = TestApp::spawn();
    app.signup("alice", "Alice Liddell", "rabbit-hole").await;

    for path in ["/users/alice", "/users/alice/followers", "/users/alice/followings"] {
        let html = body(&app.get(path).await);
        assert!(!html.contains("<button type=\"submit\">Follow</button>"), "{path}");
        assert!(!html.contains("<button type=\"submit\">Unfollow</button>"), "{path}");
    }
}

#[tokio::test]
async fn following_and_unfollowing_another_user() {
    let app = TestApp::spawn();
    let alice = app.seed_user("alice", "Alice Liddell").await;
    app.signup("bob", "Bob", "builder").await;
    let bob = app.store.get_by_name("bob").await.unwrap().unwrap();

    let html = body(&app.get("/users/alice").await);
    assert!(html.contains(r#"action="/users/alice/follow""#));

    let response = app.post_form("/users/alice/follow", Some("/users/alice"), &[]).await;
    assert_redirect_to(&response, "/users/alice");
    assert!(app.store.is_following(alice.id, bob.id).await.unwrap());

    let html = body(&app.get("/users/alice").await);
    assert!(html.contains(r#"action="/users/alice/unfollow""#));
    assert!(html.contains("Followers <strong>1</strong>"));

    let response = app.post_form("/users/alice/unfollow", Some("/users/alice"), &[]).await;
    assert_redirect_to(&response, "/users/alice");
    assert!(!app.store.is_following(alice.id, bob.id).await.unwrap());
}

#[tokio::test]
async fn following_requires_a_login() {
    let app = TestApp::spawn();
    let alice = app.seed_user("alice", "Alice Liddell").await;

    let response = app.post_form("/users/alice/follow", None, &[]).await;

    assert_redirect_to(&response, "/login");
    assert!(app.store.get_follower_ids(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn followers_and_followings_pages_list_people() {
    let app = TestApp::spawn();
    let alice = app.seed_user("alice", "Alice Liddell").await;
    let bob = app.seed_user("bob", "Bob").await;
    let carol = app.seed_user("carol", "Carol").await;
    app.store.follow(alice.id, bob.id).await.unwrap();
    app.store.follow(alice.id, carol.id).await.unwrap();

    let response = app.get("/users/alice/followers").await;
    assert_eq!(response.status_code(), 200);
    let html = body(&response);
    assert!(html.contains("<title>People following Alice Liddell</title>"));
    assert!(html.contains("Followers <strong>2</strong>"));
    let bob_at = html.find(r#"<a href="/users/bob">"#).expect("bob missing");
    let carol_at = html.find(r#"<a href="/users/carol">"#).expect("carol missing");
    assert!(bob_at < carol_at);

    let html = body(&app.get("/users/bob/followings").await);
    assert!(html.contains("<title>People followed by Bob</title>"));
    assert!(html.contains("Following <strong>1</strong>"));
    assert!(html.contains(r#"<a href="/users/alice">Alice Liddell <small>@alice</small></a>"#));

    let html = body(&app.get("/users/carol/followers").await);
    assert!(html.contains("Nobody yet."));
}

#[tokio::test]
async fn model_failures_abort_profile_pages_with_a_500() {
    let app = TestApp::spawn_with_users(|store| Arc::new(FollowersDown(store)) as Arc<dyn UserStore>);
    let alice = app.seed_user("alice", "Alice Liddell").await;
    app.seed_tweet(Some(&alice), "Down the rabbit hole", SignedDuration::from_mins(5)).await;

    for path in ["/users/alice", "/users/alice/followers", "/users/alice/followings"] {
        let response = app.get(path).await;

        assert_eq!(response.status_code(), 500, "{path}");
        let html = body(&response);
        assert!(html.contains("Internal Server Error"), "{path}");
        assert!(!html.contains("Alice Liddell"), "{path}");
        assert!(!html.contains("Down the rabbit hole"), "{path}");
        assert!(!html.contains(r#"class="profile""#), "{path}");
    }
}

#[tokio::test]
async fn follower_pages_offer_unfollow_to_followers() {
    let app = TestApp::spawn();
    let alice = app.seed_user("alice", "Alice Liddell").await;
    app.signup("bob", "Bob", "builder").await;
    let bob = app.store.get_by_name("bob").await.unwrap().unwrap();
    app.store.follow(alice.id, bob.id).await.unwrap();

    for path in ["/users/alice/followers", "/users/alice/followings"] {
        let html = body(&app.get(path).await);
        assert!(html.contains(r#"action="/users/alice/unfollow""#), "{path}");
        assert!(!html.contains(r#"action="/users/alice/follow""#), "{path}");
    }
}

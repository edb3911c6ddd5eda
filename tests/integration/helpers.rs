use std::sync::{Arc, Mutex, Once};

use bytes::Bytes;
use chirp::app::{self, AppState};
use chirp::config::SessionConfig;
use chirp::model::{MemoryStore, NewTweet, NewUser, TweetStore, User, UserStore};
use chirp::session::SessionStore;
use chirp::{Response, Router};
use jiff::{SignedDuration, Timestamp};
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

/// The whole application, driven in process, with a one-cookie jar that
/// follows `set-cookie` like a browser would.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    cookie: Mutex<Option<String>>,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::spawn_with_users(|store| store as Arc<dyn UserStore>)
    }

    /// Like [`TestApp::spawn`], with the user store the handlers see built
    /// around the in-memory one.
    pub fn spawn_with_users(
        users: impl FnOnce(Arc<MemoryStore>) -> Arc<dyn UserStore>,
    ) -> Self {
        Self::init_telemetry();
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(users(store.clone()), store.clone())
            .expect("Failed to parse templates");
        let router = app::router(state, Arc::new(SessionStore::new()), SessionConfig::default());
        TestApp { router, store, cookie: Mutex::new(None) }
    }

    fn init_telemetry() {
        // Initialize the telemetry setup at most once.
        static INIT_TELEMETRY: Once = Once::new();
        INIT_TELEMETRY.call_once(|| {
            // Only enable the telemetry if the `TEST_LOG` environment variable is set.
            if std::env::var("TEST_LOG").is_ok() {
                let subscriber = tracing_subscriber::fmt::Subscriber::builder()
                    .with_env_filter(
                        EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")),
                    )
                    .finish();
                set_global_default(subscriber).expect("Failed to set a `tracing` global subscriber")
            }
        });
    }

    pub fn has_session_cookie(&self) -> bool {
        self.cookie.lock().unwrap().is_some()
    }

    /// Forgets the session cookie, as a fresh browser would.
    pub fn clear_cookies(&self) {
        *self.cookie.lock().unwrap() = None;
    }

    async fn send(&self, builder: http::request::Builder, body: Bytes) -> Response {
        let builder = match self.cookie.lock().unwrap().as_deref() {
            Some(cookie) => builder.header("cookie", cookie),
            None => builder,
        };
        let request = builder.body(body).expect("Failed to build request");
        let response = self.router.dispatch(request.into()).await;

        for header in response.header_all("set-cookie") {
            let pair = header.split(';').next().unwrap_or_default().trim();
            let value = pair.split_once('=').map(|(_, v)| v).unwrap_or_default();
            *self.cookie.lock().unwrap() = if value.is_empty() {
                None
            } else {
                Some(pair.to_owned())
            };
        }
        response
    }

    pub async fn get(&self, path: &str) -> Response {
        self.send(http::Request::get(path), Bytes::new()).await
    }

    /// Posts an urlencoded form, claiming to come from `referer` if given.
    pub async fn post_form(
        &self,
        path: &str,
        referer: Option<&str>,
        fields: &[(&str, &str)],
    ) -> Response {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let mut builder = http::Request::post(path)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(referer) = referer {
            builder = builder.header("referer", referer);
        }
        self.send(builder, Bytes::from(body)).await
    }

    pub async fn signup(&self, name: &str, fullname: &str, pass: &str) -> Response {
        self.post_form(
            "/signup",
            Some("/signup"),
            &[("user[name]", name), ("user[pass]", pass), ("user[fullname]", fullname)],
        )
        .await
    }

    pub async fn login(&self, name: &str, pass: &str) -> Response {
        self.post_form("/login", Some("/login"), &[("user[name]", name), ("user[pass]", pass)])
            .await
    }

    /// Saves a user straight into the store. It cannot log in.
    pub async fn seed_user(&self, name: &str, fullname: &str) -> User {
        UserStore::save(
            self.store.as_ref(),
            NewUser {
                name: name.to_owned(),
                fullname: fullname.to_owned(),
                password_hash: String::new(),
            },
        )
        .await
        .expect("Failed to seed user")
    }

    pub async fn seed_tweet(&self, author: Option<&User>, body: &str, age: SignedDuration) {
        TweetStore::save(
            self.store.as_ref(),
            NewTweet {
                body: body.to_owned(),
                user: author.map(|u| u.id),
                created_at: Timestamp::now() - age,
            },
        )
        .await
        .expect("Failed to seed tweet");
    }
}

pub fn body(response: &Response) -> String {
    String::from_utf8(response.body().to_vec()).expect("Response body is not UTF-8")
}

pub fn assert_redirect_to(response: &Response, location: &str) {
    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), Some(location));
}

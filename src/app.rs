//! Application wiring: shared state and the route table.

use std::sync::Arc;

use crate::auth;
use crate::config::SessionConfig;
use crate::error::Error;
use crate::health;
use crate::method::Method;
use crate::middleware::{self, Stack};
use crate::model::{TweetStore, UserStore};
use crate::request::Request;
use crate::router::Router;
use crate::routes;
use crate::session::{SessionLayer, SessionStore};
use crate::views::Views;

/// What every handler can reach: the model collaborators and the templates.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tweets: Arc<dyn TweetStore>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, tweets: Arc<dyn TweetStore>) -> Result<Self, Error> {
        Ok(Self { users, tweets, views: Arc::new(Views::new()?) })
    }

    /// The state [`router`] attached to `req`.
    pub fn from_request(req: &Request) -> Result<AppState, Error> {
        req.extension::<AppState>()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("application state is not attached to the router").into())
    }
}

/// Builds the full route table.
///
/// Global layers, outermost first: request tracing, sessions, current user.
pub fn router(state: AppState, sessions: Arc<SessionStore>, session_config: SessionConfig) -> Router {
    Router::new()
        .with_state(state)
        .layer(middleware::trace::trace)
        .layer(SessionLayer::new(sessions, session_config))
        .layer(auth::load_current_user)
        .fallback(routes::not_found)
        // probes
        .on(Method::Get,  "/healthz",                  health::liveness)
        .on(Method::Get,  "/readyz",                   health::readiness)
        // home and timeline
        .on(Method::Get,  "/",                         routes::home::index)
        .on(Method::Post, "/tweets",                   routes::home::create_tweet())
        // accounts
        .on(Method::Get,  "/signup",                   routes::signup::form)
        .on(Method::Post, "/signup",                   routes::signup::create())
        .on(Method::Get,  "/login",                    routes::login::form)
        .on(Method::Post, "/login",                    routes::login::create())
        .on(Method::Post, "/logout",                   routes::login::destroy)
        // profiles
        .on(Method::Get,  "/users/{name}",             Stack::new().with(routes::users::is_me).to(routes::users::profile))
        .on(Method::Get,  "/users/{name}/followers",   Stack::new().with(routes::users::is_me).to(routes::users::followers))
        .on(Method::Get,  "/users/{name}/followings",  Stack::new().with(routes::users::is_me).to(routes::users::followings))
        .on(Method::Post, "/users/{name}/follow",      Stack::new().with(auth::require_login).to(routes::users::follow))
        .on(Method::Post, "/users/{name}/unfollow",    Stack::new().with(auth::require_login).to(routes::users::unfollow))
}

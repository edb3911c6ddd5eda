//! # chirp
//!
//! The user-facing pages of a small microblogging service: signing up,
//! logging in, profiles, and who follows whom. Pages are rendered on the
//! server; the model layer sits behind the [`model::UserStore`] and
//! [`model::TweetStore`] traits.
//!
//! ## Layout
//!
//! - The HTTP layer ([`Router`], [`Request`], [`Response`], [`Server`],
//!   [`middleware`]): radix-tree routing via [`matchit`], hyper underneath,
//!   graceful shutdown on SIGTERM / Ctrl-C.
//! - [`validate`]: form validation chains built from middleware.
//! - [`session`]: cookie sessions and flash messages.
//! - [`routes`]: the handlers; [`app::router`] wires them up.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chirp::app::{self, AppState};
//! use chirp::model::MemoryStore;
//! use chirp::session::SessionStore;
//! use chirp::{Config, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chirp::Error> {
//!     let config = Config::load()?;
//!     let store = Arc::new(MemoryStore::new());
//!     let state = AppState::new(store.clone(), store)?;
//!     let router = app::router(state, Arc::new(SessionStore::new()), config.session);
//!
//!     Server::bind(config.server.socket_addr()).serve(router).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod auth;
pub mod config;
pub mod health;
pub mod middleware;
pub mod model;
pub mod password;
pub mod routes;
pub mod session;
pub mod telemetry;
pub mod validate;
pub mod views;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use status::Status;

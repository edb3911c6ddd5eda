//! The data-access abstraction for users and tweets.
//!
//! Routes only ever see `Arc<dyn UserStore>` and `Arc<dyn TweetStore>`.
//! [`MemoryStore`] backs both for local runs and tests; a database-backed
//! implementation plugs in behind the same traits.

mod memory;
mod tweet;
mod user;

pub use memory::MemoryStore;
pub use tweet::{NewTweet, Tweet, TweetId, TweetStore};
pub use user::{NewUser, User, UserId, UserStore};

/// What the model layer can fail with.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user name `{0}` is already taken")]
    NameTaken(String),

    #[error("user {0} does not exist")]
    UnknownUser(UserId),

    #[error("storage backend failure")]
    Backend(#[source] anyhow::Error),
}

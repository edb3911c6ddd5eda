use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use super::StoreError;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered account.
///
/// The password hash never reaches a template: it is skipped on serialization.
#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub fullname: String,
    #[serde(skip)]
    pub password_hash: String,
}

/// An account that has not been saved yet.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub fullname: String,
    /// PHC-encoded password hash, see [`crate::password`].
    pub password_hash: String,
}

/// Users and the follow graph between them.
///
/// Follow edges read as "`follower_id` follows `user_id`". Id lists come back
/// in follow order.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Persists a new user and assigns its id. Fails with
    /// [`StoreError::NameTaken`] if the name is in use.
    async fn save(&self, user: NewUser) -> Result<User, StoreError>;

    /// Ids of the users following `id`.
    async fn get_follower_ids(&self, id: UserId) -> Result<Vec<UserId>, StoreError>;

    /// Ids of the users `id` follows.
    async fn get_following_ids(&self, id: UserId) -> Result<Vec<UserId>, StoreError>;

    async fn get_followers(&self, id: UserId) -> Result<Vec<User>, StoreError>;

    async fn get_followings(&self, id: UserId) -> Result<Vec<User>, StoreError>;

    /// Whether `user_id` is followed by `follower_id`.
    async fn is_following(&self, user_id: UserId, follower_id: UserId) -> Result<bool, StoreError>;

    /// Makes `follower_id` follow `user_id`. Idempotent.
    async fn follow(&self, user_id: UserId, follower_id: UserId) -> Result<(), StoreError>;

    /// Removes the edge if present.
    async fn unfollow(&self, user_id: UserId, follower_id: UserId) -> Result<(), StoreError>;
}

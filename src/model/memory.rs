use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexSet;
use tokio::sync::RwLock;

use super::{NewTweet, NewUser, StoreError, Tweet, TweetId, TweetStore, User, UserId, UserStore};

/// Process-local implementation of both model traits.
///
/// Everything lives behind one `RwLock`; no lock is held across an `.await`
/// other than the lock acquisition itself.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<UserId, User>,
    by_name: HashMap<String, UserId>,
    /// user id -> ids of the users following it, in follow order.
    followers: HashMap<UserId, IndexSet<UserId>>,
    /// user id -> ids of the users it follows, in follow order.
    followings: HashMap<UserId, IndexSet<UserId>>,
    tweets: Vec<Tweet>,
    next_user_id: u64,
    next_tweet_id: u64,
}

impl Inner {
    fn ensure_exists(&self, id: UserId) -> Result<(), StoreError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::UnknownUser(id))
        }
    }

    fn resolve(&self, ids: Option<&IndexSet<UserId>>) -> Vec<User> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.users.get(id).cloned())
            .collect()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.by_name.get(name).and_then(|id| inner.users.get(id)).cloned())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    #[tracing::instrument(name = "Save user", skip_all, fields(user.name = %user.name))]
    async fn save(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.by_name.contains_key(&user.name) {
            return Err(StoreError::NameTaken(user.name));
        }
        inner.next_user_id += 1;
        let id = UserId(inner.next_user_id);
        let user = User {
            id,
            name: user.name,
            fullname: user.fullname,
            password_hash: user.password_hash,
        };
        inner.by_name.insert(user.name.clone(), id);
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_follower_ids(&self, id: UserId) -> Result<Vec<UserId>, StoreError> {
        let inner = self.inner.read().await;
        inner.ensure_exists(id)?;
        Ok(inner.followers.get(&id).map(|s| s.iter().copied().collect()).unwrap_or_default())
    }

    async fn get_following_ids(&self, id: UserId) -> Result<Vec<UserId>, StoreError> {
        let inner = self.inner.read().await;
        inner.ensure_exists(id)?;
        Ok(inner.followings.get(&id).map(|s| s.iter().copied().collect()).unwrap_or_default())
    }

    async fn get_followers(&self, id: UserId) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        inner.ensure_exists(id)?;
        Ok(inner.resolve(inner.followers.get(&id)))
    }

    async fn get_followings(&self, id: UserId) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        inner.ensure_exists(id)?;
        Ok(inner.resolve(inner.followings.get(&id)))
    }

    async fn is_following(&self, user_id: UserId, follower_id: UserId) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.followers.get(&user_id).is_some_and(|s| s.contains(&follower_id)))
    }

    #[tracing::instrument(name = "Follow user", skip(self))]
    async fn follow(&self, user_id: UserId, follower_id: UserId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.ensure_exists(user_id)?;
        inner.ensure_exists(follower_id)?;
        if user_id == follower_id {
            return Ok(());
        }
        inner.followers.entry(user_id).or_default().insert(follower_id);
        inner.followings.entry(follower_id).or_default().insert(user_id);
        Ok(())
    }

    #[tracing::instrument(name = "Unfollow user", skip(self))]
    async fn unfollow(&self, user_id: UserId, follower_id: UserId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(set) = inner.followers.get_mut(&user_id) {
            set.shift_remove(&follower_id);
        }
        if let Some(set) = inner.followings.get_mut(&follower_id) {
            set.shift_remove(&user_id);
        }
        Ok(())
    }
}

#[async_trait]
impl TweetStore for MemoryStore {
    async fn filter(
        &self,
        predicate: &(dyn for<'t> Fn(&'t Tweet) -> bool + Send + Sync),
    ) -> Result<Vec<Tweet>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.tweets.iter().filter(|t| predicate(t)).cloned().collect())
    }

    async fn save(&self, tweet: NewTweet) -> Result<Tweet, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(id) = tweet.user {
            inner.ensure_exists(id)?;
        }
        inner.next_tweet_id += 1;
        let tweet = Tweet {
            id: TweetId(inner.next_tweet_id),
            body: tweet.body,
            user: tweet.user,
            created_at: tweet.created_at,
        };
        inner.tweets.push(tweet.clone());
        Ok(tweet)
    }
}

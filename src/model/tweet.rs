use async_trait::async_trait;
use jiff::Timestamp;
use serde::Serialize;

use super::{StoreError, UserId};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TweetId(pub u64);

#[derive(Clone, Debug)]
pub struct Tweet {
    pub id: TweetId,
    pub body: String,
    /// Owner of the tweet. Tweets whose author was removed have none.
    pub user: Option<UserId>,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug)]
pub struct NewTweet {
    pub body: String,
    pub user: Option<UserId>,
    pub created_at: Timestamp,
}

#[async_trait]
pub trait TweetStore: Send + Sync {
    /// Every tweet `predicate` accepts, in storage order.
    async fn filter(
        &self,
        predicate: &(dyn for<'t> Fn(&'t Tweet) -> bool + Send + Sync),
    ) -> Result<Vec<Tweet>, StoreError>;

    async fn save(&self, tweet: NewTweet) -> Result<Tweet, StoreError>;
}

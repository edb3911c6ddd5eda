//! `GET /` and `POST /tweets`.

use std::collections::HashMap;

use futures_util::future::try_join_all;
use indexmap::IndexSet;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::auth::{self, CurrentUser};
use crate::error::Error;
use crate::middleware::{Layered, Stack};
use crate::model::{NewTweet, Tweet, UserId};
use crate::request::Request;
use crate::response::Response;
use crate::validate;
use crate::views::TweetView;

#[derive(Serialize)]
struct Home {
    tweets: Vec<TweetView>,
}

/// Everyone's tweets, newest first, for logged-in users; a welcome page otherwise.
pub async fn index(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let tweets = match CurrentUser::from_request(&req) {
        Some(_) => timeline(&state).await?,
        None => Vec::new(),
    };
    let html = super::render(&req, &state, "home", "Twitter".to_owned(), Home { tweets })?;
    Ok(Response::html(html))
}

/// Authors are looked up concurrently, once each.
async fn timeline(state: &AppState) -> Result<Vec<TweetView>, Error> {
    let mut tweets = state.tweets.filter(&|_: &Tweet| true).await?;
    tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let ids: IndexSet<UserId> = tweets.iter().filter_map(|t| t.user).collect();
    let users = try_join_all(ids.iter().map(|&id| state.users.get_by_id(id))).await?;
    let authors: HashMap<UserId, String> = users
        .into_iter()
        .flatten()
        .map(|user| (user.id, user.name))
        .collect();

    let now = Timestamp::now();
    Ok(tweets
        .into_iter()
        .map(|t| {
            let author = t.user.and_then(|id| authors.get(&id).cloned());
            TweetView::new(t, now).with_author(author)
        })
        .collect())
}

#[derive(Deserialize)]
struct TweetForm {
    #[serde(rename = "tweet[body]")]
    body: String,
}

pub fn create_tweet() -> Layered {
    Stack::new()
        .with(auth::require_login)
        .with(validate::required("tweet[body]"))
        .with(validate::length_less_than_or_equal_to("tweet[body]", 140))
        .to(publish)
}

async fn publish(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let Some(me) = CurrentUser::from_request(&req) else {
        return Ok(Response::redirect("/login"));
    };
    let form: TweetForm = req.form()?;
    let tweet = state.tweets
        .save(NewTweet { body: form.body, user: Some(me.id), created_at: Timestamp::now() })
        .await?;
    tracing::info!(tweet.id = ?tweet.id, user.id = %me.id, "tweet published");
    Ok(Response::redirect("/"))
}

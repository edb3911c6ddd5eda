//! Profile pages: `/users/{name}`, `/users/{name}/followers`,
//! `/users/{name}/followings`, plus follow / unfollow.
//!
//! Every page resolves the user first, then runs its independent lookups
//! concurrently, then loads that user's tweets. Nothing renders until every
//! lookup has completed; any model failure aborts the request.

use jiff::Timestamp;
use serde::Serialize;

use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::error::Error;
use crate::middleware::Next;
use crate::model::{StoreError, Tweet, User, UserId};
use crate::request::Request;
use crate::response::Response;
use crate::views::TweetView;

/// Whether the profile being viewed belongs to the logged-in user.
#[derive(Clone, Copy, Debug)]
pub struct IsMe(pub bool);

/// Route middleware comparing the `{name}` path parameter with the logged-in
/// user's name.
pub async fn is_me(mut req: Request, next: Next) -> Response {
    let is_me = match (CurrentUser::from_request(&req), req.param("name")) {
        (Some(me), Some(name)) => me.name == name,
        _ => false,
    };
    req.extensions_mut().insert(IsMe(is_me));
    next.run(req).await
}

fn is_me_flag(req: &Request) -> bool {
    req.extension::<IsMe>().is_some_and(|m| m.0)
}

async fn lookup(req: &Request, state: &AppState) -> Result<Option<User>, Error> {
    match req.param("name") {
        Some(name) => Ok(state.users.get_by_name(name).await?),
        None => Ok(None),
    }
}

/// `false` for anonymous visitors, without asking the model.
async fn is_followed_by(
    state: &AppState,
    user_id: UserId,
    me: Option<&User>,
) -> Result<bool, StoreError> {
    match me {
        Some(me) => state.users.is_following(user_id, me.id).await,
        None => Ok(false),
    }
}

/// `user`'s tweets, newest first, with humanized ages.
async fn tweets_of(state: &AppState, user: &User) -> Result<Vec<TweetView>, StoreError> {
    let owner = user.id;
    let mut tweets = state.tweets.filter(&move |t: &Tweet| t.user == Some(owner)).await?;
    tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let now = Timestamp::now();
    Ok(tweets.into_iter().map(|t| TweetView::new(t, now)).collect())
}

// ── GET /users/{name} ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ProfilePage {
    user: User,
    tweets: Vec<TweetView>,
    tweets_count: usize,
    followers_count: usize,
    followings_count: usize,
    is_following: bool,
    is_me: bool,
}

pub async fn profile(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let Some(user) = lookup(&req, &state).await? else {
        return super::not_found_page(&req, &state);
    };
    let me = CurrentUser::from_request(&req);

    let (follower_ids, following_ids, is_following) = tokio::try_join!(
        state.users.get_follower_ids(user.id),
        state.users.get_following_ids(user.id),
        is_followed_by(&state, user.id, me),
    )?;
    let tweets = tweets_of(&state, &user).await?;

    let title = format!("{} (@{})", user.fullname, user.name);
    let page = ProfilePage {
        tweets_count: tweets.len(),
        followers_count: follower_ids.len(),
        followings_count: following_ids.len(),
        is_following,
        is_me: is_me_flag(&req),
        tweets,
        user,
    };
    Ok(Response::html(super::render(&req, &state, "users", title, page)?))
}

// ── GET /users/{name}/followers ───────────────────────────────────────────────

#[derive(Serialize)]
struct FollowersPage {
    user: User,
    tweets: Vec<TweetView>,
    tweets_count: usize,
    followers: Vec<User>,
    followers_count: usize,
    followings_count: usize,
    is_following: bool,
    is_me: bool,
}

pub async fn followers(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let Some(user) = lookup(&req, &state).await? else {
        return super::not_found_page(&req, &state);
    };
    let me = CurrentUser::from_request(&req);

    let (followers, following_ids, is_following) = tokio::try_join!(
        state.users.get_followers(user.id),
        state.users.get_following_ids(user.id),
        is_followed_by(&state, user.id, me),
    )?;
    let tweets = tweets_of(&state, &user).await?;

    let title = format!("People following {}", user.fullname);
    let page = FollowersPage {
        tweets_count: tweets.len(),
        followers_count: followers.len(),
        followings_count: following_ids.len(),
        followers,
        is_following,
        is_me: is_me_flag(&req),
        tweets,
        user,
    };
    Ok(Response::html(super::render(&req, &state, "followers", title, page)?))
}

// ── GET /users/{name}/followings ──────────────────────────────────────────────

#[derive(Serialize)]
struct FollowingsPage {
    user: User,
    tweets: Vec<TweetView>,
    tweets_count: usize,
    followings: Vec<User>,
    followers_count: usize,
    followings_count: usize,
    is_following: bool,
    is_me: bool,
}

pub async fn followings(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let Some(user) = lookup(&req, &state).await? else {
        return super::not_found_page(&req, &state);
    };
    let me = CurrentUser::from_request(&req);

    let (follower_ids, followings, is_following) = tokio::try_join!(
        state.users.get_follower_ids(user.id),
        state.users.get_followings(user.id),
        is_followed_by(&state, user.id, me),
    )?;
    let tweets = tweets_of(&state, &user).await?;

    let title = format!("People followed by {}", user.fullname);
    let page = FollowingsPage {
        tweets_count: tweets.len(),
        followers_count: follower_ids.len(),
        followings_count: followings.len(),
        followings,
        is_following,
        is_me: is_me_flag(&req),
        tweets,
        user,
    };
    Ok(Response::html(super::render(&req, &state, "followings", title, page)?))
}

// ── POST /users/{name}/follow, /unfollow ──────────────────────────────────────

pub async fn follow(req: Request) -> Result<Response, Error> {
    change_follow(req, true).await
}

pub async fn unfollow(req: Request) -> Result<Response, Error> {
    change_follow(req, false).await
}

async fn change_follow(req: Request, follow: bool) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let Some(me) = CurrentUser::from_request(&req) else {
        return Ok(Response::redirect("/login"));
    };
    let Some(user) = lookup(&req, &state).await? else {
        return super::not_found_page(&req, &state);
    };
    if follow {
        state.users.follow(user.id, me.id).await?;
    } else {
        state.users.unfollow(user.id, me.id).await?;
    }
    Ok(Response::redirect(&format!("/users/{}", user.name)))
}

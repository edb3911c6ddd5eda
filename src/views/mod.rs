//! Server-rendered pages.
//!
//! Templates are Liquid sources compiled into the binary and parsed once at
//! startup. Every page shares the same frame (`header` / `footer` partials),
//! which expects `title`, `flash` and `me` next to the page's own fields;
//! [`Page`] carries them.

mod relative_time;

use std::collections::HashMap;

use liquid::partials::{EagerCompiler, InMemorySource};
use serde::Serialize;

use crate::error::Error;
use crate::model::{Tweet, User};
use crate::session::Flash;

pub use relative_time::from_now;

type Partials = EagerCompiler<InMemorySource>;

const PARTIALS: &[(&str, &str)] = &[
    ("header", include_str!("templates/header.liquid")),
    ("footer", include_str!("templates/footer.liquid")),
    ("profile", include_str!("templates/profile.liquid")),
    ("people", include_str!("templates/people.liquid")),
    ("tweets", include_str!("templates/tweets.liquid")),
];

const PAGES: &[(&str, &str)] = &[
    ("home", include_str!("templates/home.liquid")),
    ("signup", include_str!("templates/signup.liquid")),
    ("login", include_str!("templates/login.liquid")),
    ("users", include_str!("templates/users.liquid")),
    ("followers", include_str!("templates/followers.liquid")),
    ("followings", include_str!("templates/followings.liquid")),
    ("not_found", include_str!("templates/not_found.liquid")),
];

/// The parsed page templates.
pub struct Views {
    pages: HashMap<&'static str, liquid::Template>,
}

impl Views {
    pub fn new() -> Result<Views, Error> {
        let mut partials = Partials::empty();
        for &(name, source) in PARTIALS {
            partials.add(name, source);
        }
        let parser = liquid::ParserBuilder::with_stdlib()
            .partials(partials)
            .build()
            .map_err(|source| Error::Template { name: "<partials>", source })?;

        let mut pages = HashMap::with_capacity(PAGES.len());
        for &(name, source) in PAGES {
            let template = parser
                .parse(source)
                .map_err(|source| Error::Template { name, source })?;
            pages.insert(name, template);
        }
        Ok(Views { pages })
    }

    /// Renders page `name` with `context`, which must serialize to a map.
    pub fn render(&self, name: &'static str, context: &impl Serialize) -> Result<String, Error> {
        let template = self.pages.get(name).ok_or_else(|| {
            Error::Unexpected(anyhow::anyhow!("no template named `{name}`"))
        })?;
        let globals = liquid::to_object(context).map_err(|source| Error::Template { name, source })?;
        template
            .render(&globals)
            .map_err(|source| Error::Template { name, source })
    }
}

/// The frame every page is rendered in.
#[derive(Serialize)]
pub struct Page<'a, T> {
    pub title: String,
    pub flash: Vec<Flash>,
    /// The logged-in user.
    pub me: Option<&'a User>,
    #[serde(flatten)]
    pub body: T,
}

/// A tweet as templates see it: the timestamp is already humanized.
#[derive(Debug, Serialize)]
pub struct TweetView {
    pub id: crate::model::TweetId,
    pub body: String,
    pub created_at: String,
    /// Author's handle, when the page shows tweets from several users.
    pub author: Option<String>,
}

impl TweetView {
    pub fn new(tweet: Tweet, now: jiff::Timestamp) -> Self {
        TweetView {
            id: tweet.id,
            created_at: from_now(tweet.created_at, now),
            body: tweet.body,
            author: None,
        }
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }
}

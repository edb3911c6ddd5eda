//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::Error;

/// An incoming HTTP request: the head hyper parsed, the fully buffered body,
/// and the path parameters captured by the router.
pub struct Request {
    pub(crate) head: http::request::Parts,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub fn new(head: http::request::Parts, body: Bytes) -> Self {
        Self { head, body, params: HashMap::new() }
    }

    pub fn method(&self) -> &http::Method { &self.head.method }
    pub fn path(&self) -> &str { self.head.uri.path() }
    pub fn query(&self) -> Option<&str> { self.head.uri.query() }
    pub fn headers(&self) -> &http::HeaderMap { &self.head.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Values that are not visible ASCII are skipped.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{name}`, `req.param("name")` on `/users/alice` returns `Some("alice")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Values attached by the router (`Router::with_state`) and by middleware.
    pub fn extensions(&self) -> &http::Extensions { &self.head.extensions }
    pub fn extensions_mut(&mut self) -> &mut http::Extensions { &mut self.head.extensions }

    /// Shorthand for `req.extensions().get::<T>()`.
    pub fn extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.head.extensions.get::<T>()
    }

    /// Deserializes an `application/x-www-form-urlencoded` body.
    ///
    /// Bracketed keys such as `user[name]` are plain keys: map them with
    /// `#[serde(rename = "user[name]")]`.
    pub fn form<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_html_form::from_bytes(&self.body).map_err(|e| Error::Form(Box::new(e)))
    }

    /// Looks up a single field of an urlencoded body. The first occurrence wins.
    pub fn form_field(&self, key: &str) -> Option<String> {
        form_urlencoded::parse(&self.body)
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (head, body) = req.into_parts();
        Self::new(head, body)
    }
}

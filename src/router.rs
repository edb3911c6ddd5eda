//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler; global middleware wraps whatever the lookup produced.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve)
/// or drive it directly with [`Router::dispatch`].
/// Each builder call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    layers: Arc<[BoxedMiddleware]>,
    fallback: BoxedHandler,
    extensions: http::Extensions,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            layers: Vec::new().into(),
            fallback: not_found.into_boxed_handler(),
            extensions: http::Extensions::new(),
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use chirp::{Method, Request, Response, Router};
    /// # async fn profile(_: Request) -> Response { Response::text("") }
    /// # async fn followers(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get, "/users/{name}",           profile)
    ///     .on(Method::Get, "/users/{name}/followers", followers);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` conflicts with an already registered route.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Wrap every request in `middleware`. Layers run in registration order,
    /// around both matched routes and the fallback.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        let mut layers = self.layers.to_vec();
        layers.push(Arc::new(middleware));
        self.layers = layers.into();
        self
    }

    /// Handler for requests that match no route. Defaults to a bare `404`.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = handler.into_boxed_handler();
        self
    }

    /// Attach a value every request carries in its extensions.
    pub fn with_state<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Routes one request through the global layers to its handler.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let Ok(method) = Method::try_from(req.method()) else {
            return Response::status(Status::MethodNotAllowed);
        };

        req.head.extensions.extend(self.extensions.clone());

        let endpoint = match self.lookup(method, req.path()) {
            Some((handler, params)) => {
                req.params = params;
                handler
            }
            None => Arc::clone(&self.fallback),
        };

        if self.layers.is_empty() {
            return endpoint.call(req).await;
        }
        Next::new(Arc::clone(&self.layers), endpoint).run(req).await
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

async fn not_found(_req: Request) -> Response {
    Response::status(Status::NotFound)
}

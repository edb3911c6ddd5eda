//! Middleware layer.
//!
//! Middleware intercepts a request before its handler runs and may
//! short-circuit with its own response. Two places accept middleware:
//!
//! - [`Router::layer`](crate::Router::layer) wraps every request, 404s included
//!   (sessions, tracing, loading the logged-in user).
//! - [`Stack`] wraps a single route (form validation, per-route guards).
//!
//! A middleware is any `async fn(Request, Next) -> impl IntoResponse`, or a
//! struct implementing [`Middleware`] when it carries configuration:
//!
//! ```rust,no_run
//! use chirp::middleware::{Next, Stack};
//! use chirp::{Method, Request, Response, Router, Status};
//!
//! async fn members_only(req: Request, next: Next) -> Response {
//!     if req.header("x-member").is_none() {
//!         return Response::status(Status::Forbidden);
//!     }
//!     next.run(req).await
//! }
//!
//! async fn lounge(_req: Request) -> Response { Response::text("welcome") }
//!
//! let app = Router::new()
//!     .on(Method::Get, "/lounge", Stack::new().with(members_only).to(lounge));
//! ```

pub mod trace;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{private, BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::request::Request;
use crate::response::IntoResponse;

/// A request interceptor.
///
/// Implemented for every `Fn(Request, Next) -> impl Future<Output = impl IntoResponse>`.
/// Implement it by hand on structs that carry their own configuration.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let fut = (self)(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// The remainder of a middleware chain.
///
/// Calling [`Next::run`] hands the request to the next middleware, or to the
/// endpoint once the chain is exhausted. Dropping it short-circuits the chain.
pub struct Next {
    chain: Arc<[BoxedMiddleware]>,
    index: usize,
    endpoint: BoxedHandler,
}

impl Next {
    pub(crate) fn new(chain: Arc<[BoxedMiddleware]>, endpoint: BoxedHandler) -> Self {
        Self { chain, index: 0, endpoint }
    }

    pub fn run(self, req: Request) -> BoxFuture {
        let Some(middleware) = self.chain.get(self.index).cloned() else {
            return self.endpoint.call(req);
        };
        let next = Next { index: self.index + 1, ..self };
        middleware.call(req, next)
    }
}

// ── Per-route chains ──────────────────────────────────────────────────────────

/// Builder for a route guarded by middleware. Layers run in the order they
/// were added; the handler passed to [`Stack::to`] runs last.
#[derive(Default)]
pub struct Stack {
    layers: Vec<BoxedMiddleware>,
}

impl Stack {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    pub fn to(self, handler: impl Handler) -> Layered {
        Layered {
            layers: self.layers.into(),
            endpoint: handler.into_boxed_handler(),
        }
    }
}

/// A handler wrapped by a [`Stack`]. Register it like any other handler.
pub struct Layered {
    layers: Arc<[BoxedMiddleware]>,
    endpoint: BoxedHandler,
}

impl ErasedHandler for Layered {
    fn call(&self, req: Request) -> BoxFuture {
        Next::new(Arc::clone(&self.layers), Arc::clone(&self.endpoint)).run(req)
    }
}

impl private::Sealed for Layered {}

impl Handler for Layered {
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

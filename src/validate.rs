//! Form validation middleware.
//!
//! Each validator checks one field of an urlencoded body. Chain them in a
//! [`Stack`](crate::middleware::Stack) in front of the handler that consumes
//! the form; they run in order and the first failure wins:
//!
//! ```rust,no_run
//! use chirp::middleware::Stack;
//! use chirp::{validate, Request, Response};
//!
//! async fn register(_req: Request) -> Response { Response::redirect("/") }
//!
//! let route = Stack::new()
//!     .with(validate::required("user[name]"))
//!     .with(validate::length_less_than_or_equal_to("user[name]", 15))
//!     .with(validate::username("user[name]"))
//!     .to(register);
//! ```
//!
//! A failing validator flashes an `error` message naming the field and
//! redirects back to the page the form was posted from.

use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::session::Session;

/// A single rule bound to a form field such as `user[name]`.
#[derive(Clone, Debug)]
pub struct Validator {
    field: &'static str,
    rule: Rule,
}

#[derive(Clone, Copy, Debug)]
enum Rule {
    Required,
    MaxLength(usize),
    MinLength(usize),
    Username,
}

/// The field is present and not blank.
pub fn required(field: &'static str) -> Validator {
    Validator { field, rule: Rule::Required }
}

/// The field has at most `max` characters.
pub fn length_less_than_or_equal_to(field: &'static str, max: usize) -> Validator {
    Validator { field, rule: Rule::MaxLength(max) }
}

/// The field has at least `min` characters.
pub fn length_more_than_or_equal_to(field: &'static str, min: usize) -> Validator {
    Validator { field, rule: Rule::MinLength(min) }
}

/// The field only contains ASCII letters, digits and underscores.
pub fn username(field: &'static str) -> Validator {
    Validator { field, rule: Rule::Username }
}

impl Validator {
    /// Checks `value`, the field as submitted (`None` when absent).
    ///
    /// Only [`required`] rejects a missing field; the other rules have
    /// nothing to check.
    pub fn check(&self, value: Option<&str>) -> Result<(), String> {
        let label = label(self.field);
        match (self.rule, value) {
            (Rule::Required, Some(v)) if !v.trim().is_empty() => Ok(()),
            (Rule::Required, _) => Err(format!("{label} is required")),
            (_, None) => Ok(()),
            (Rule::MaxLength(max), Some(v)) if v.chars().count() > max => {
                Err(format!("{label} must have at most {max} characters"))
            }
            (Rule::MinLength(min), Some(v)) if v.chars().count() < min => {
                Err(format!("{label} must have at least {min} characters"))
            }
            (Rule::Username, Some(v))
                if !v.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
            {
                Err(format!("{label} may only contain letters, numbers and underscores"))
            }
            _ => Ok(()),
        }
    }
}

impl Middleware for Validator {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let value = req.form_field(self.field);
        match self.check(value.as_deref()) {
            Ok(()) => next.run(req),
            Err(message) => {
                let response = reject(&req, message);
                Box::pin(async move { response })
            }
        }
    }
}

fn reject(req: &Request, message: String) -> Response {
    tracing::debug!(%message, "form validation failed");
    match Session::from_request(req) {
        Ok(session) => {
            session.flash("error", message);
            Response::redirect(back(req))
        }
        Err(e) => e.into_response(),
    }
}

/// Where a "redirect back" goes: the `Referer`, or `/` when there is none.
pub fn back(req: &Request) -> &str {
    req.header("referer").filter(|r| !r.is_empty()).unwrap_or("/")
}

/// `user[name]` reads as `user name` in messages.
fn label(field: &str) -> String {
    field
        .split(['[', ']'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

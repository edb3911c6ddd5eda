//! Request handlers, one module per page family.

pub mod home;
pub mod login;
pub mod signup;
pub mod users;

use serde::Serialize;

use crate::app::AppState;
use crate::auth::CurrentUser;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::session::Session;
use crate::status::Status;
use crate::views::Page;

/// Renders `template` inside the shared page frame, consuming pending flash
/// messages.
pub(crate) fn render<T: Serialize>(
    req: &Request,
    state: &AppState,
    template: &'static str,
    title: String,
    body: T,
) -> Result<String, Error> {
    let flash = Session::from_request(req)?.take_flash();
    let page = Page { title, flash, me: CurrentUser::from_request(req), body };
    state.views.render(template, &page)
}

#[derive(Serialize)]
struct Nothing {}

/// Fallback for unknown paths, and for profiles of users that do not exist.
pub async fn not_found(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    not_found_page(&req, &state)
}

pub(crate) fn not_found_page(req: &Request, state: &AppState) -> Result<Response, Error> {
    let html = render(req, state, "not_found", "Page not found".to_owned(), Nothing {})?;
    Ok(Response::builder().status(Status::NotFound).html(html))
}

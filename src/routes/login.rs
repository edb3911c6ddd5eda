//! `GET /login`, `POST /login` and `POST /logout`.

use secrecy::SecretString;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::Error;
use crate::middleware::{Layered, Stack};
use crate::password;
use crate::request::Request;
use crate::response::Response;
use crate::session::Session;
use crate::validate;

/// Verified against when the user name is unknown, so that both failure
/// paths cost one Argon2 verification.
const DUMMY_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$\
    gZiV/M1gPc22ElAH/Jh1Hw$\
    CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

#[derive(serde::Serialize)]
struct LoginPage {}

pub async fn form(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let html = super::render(&req, &state, "login", "Log in to Twitter".to_owned(), LoginPage {})?;
    Ok(Response::html(html))
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(rename = "user[name]")]
    name: String,
    #[serde(rename = "user[pass]")]
    pass: String,
}

pub fn create() -> Layered {
    Stack::new()
        .with(validate::required("user[name]"))
        .with(validate::required("user[pass]"))
        .to(authenticate)
}

async fn authenticate(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let session = Session::from_request(&req)?;
    let form: LoginForm = req.form()?;

    let user = state.users.get_by_name(&form.name).await?;
    let expected = user.as_ref().map_or(DUMMY_HASH, |u| u.password_hash.as_str()).to_owned();
    let matches = password::verify(expected, SecretString::from(form.pass)).await?;

    match user {
        Some(user) if matches => {
            tracing::info!(user.id = %user.id, "user logged in");
            session.set_uid(user.id);
            Ok(Response::redirect("/"))
        }
        _ => {
            session.flash("error", "Invalid username or password.");
            Ok(Response::redirect(validate::back(&req)))
        }
    }
}

pub async fn destroy(req: Request) -> Result<Response, Error> {
    Session::from_request(&req)?.clear();
    Ok(Response::redirect("/"))
}

//! `GET /signup` and `POST /signup`.

use secrecy::SecretString;
use serde::Deserialize;

use crate::app::AppState;
use crate::error::Error;
use crate::middleware::{Layered, Stack};
use crate::model::{NewUser, StoreError};
use crate::password;
use crate::request::Request;
use crate::response::Response;
use crate::session::Session;
use crate::validate;

#[derive(serde::Serialize)]
struct SignupPage {}

pub async fn form(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let html = super::render(&req, &state, "signup", "Sign up for Twitter".to_owned(), SignupPage {})?;
    Ok(Response::html(html))
}

#[derive(Deserialize)]
struct SignupForm {
    #[serde(rename = "user[name]")]
    name: String,
    #[serde(rename = "user[pass]")]
    pass: String,
    #[serde(rename = "user[fullname]")]
    fullname: String,
}

/// The signup handler behind its validation chain.
pub fn create() -> Layered {
    Stack::new()
        // username
        .with(validate::required("user[name]"))
        .with(validate::length_less_than_or_equal_to("user[name]", 15))
        .with(validate::username("user[name]"))
        // password
        .with(validate::required("user[pass]"))
        .with(validate::length_more_than_or_equal_to("user[pass]", 6))
        .with(validate::length_less_than_or_equal_to("user[pass]", 1024))
        // full name
        .with(validate::required("user[fullname]"))
        .with(validate::length_less_than_or_equal_to("user[fullname]", 20))
        .to(register)
}

async fn register(req: Request) -> Result<Response, Error> {
    let state = AppState::from_request(&req)?;
    let session = Session::from_request(&req)?;
    let form: SignupForm = req.form()?;

    if state.users.get_by_name(&form.name).await?.is_some() {
        return Ok(name_taken(&req, &session));
    }

    let password_hash = password::hash(SecretString::from(form.pass)).await?;
    let user = match state.users
        .save(NewUser { name: form.name, fullname: form.fullname, password_hash })
        .await
    {
        Ok(user) => user,
        Err(StoreError::NameTaken(_)) => return Ok(name_taken(&req, &session)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user.id = %user.id, user.name = %user.name, "user signed up");
    session.set_uid(user.id);
    Ok(Response::redirect("/"))
}

fn name_taken(req: &Request, session: &Session) -> Response {
    session.flash("error", "Username already taken!");
    Response::redirect(validate::back(req))
}

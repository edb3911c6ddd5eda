//! The logged-in user.

use crate::app::AppState;
use crate::error::Error;
use crate::middleware::Next;
use crate::model::User;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::session::Session;

/// The user the session belongs to, attached by [`load_current_user`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn from_request(req: &Request) -> Option<&User> {
        req.extension::<CurrentUser>().map(|c| &c.0)
    }
}

/// Global middleware resolving the session's user id to a [`CurrentUser`].
///
/// Must run after the session layer. A session pointing at a user that no
/// longer exists is cleared.
pub async fn load_current_user(mut req: Request, next: Next) -> Response {
    match resolve(&req).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(CurrentUser(user));
        }
        Ok(None) => {}
        Err(e) => return e.into_response(),
    }
    next.run(req).await
}

async fn resolve(req: &Request) -> Result<Option<User>, Error> {
    let session = Session::from_request(req)?;
    let Some(uid) = session.uid() else {
        return Ok(None);
    };
    let state = AppState::from_request(req)?;
    let user = state.users.get_by_id(uid).await?;
    if user.is_none() {
        tracing::warn!(%uid, "session refers to an unknown user, logging out");
        session.clear();
    }
    Ok(user)
}

/// Route middleware sending anonymous visitors to the login page.
pub async fn require_login(req: Request, next: Next) -> Response {
    if CurrentUser::from_request(&req).is_none() {
        return Response::redirect("/login");
    }
    next.run(req).await
}

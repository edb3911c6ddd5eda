//! Unified error type.

use crate::model::StoreError;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// The error type returned by chirp's fallible operations.
///
/// Application-level outcomes (a failed validation, a taken user name, an
/// unknown profile) are expressed as [`Response`] values, not as `Error`s.
/// This type surfaces everything else: binding a port, loading
/// configuration, rendering a template, talking to the model layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration")]
    Config(#[source] Box<figment::Error>),

    #[error("failed to render template `{name}`")]
    Template {
        name: &'static str,
        #[source]
        source: liquid::Error,
    },

    #[error("malformed form body")]
    Form(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// A malformed form is the client's fault; anything else is ours and gets
/// logged before the generic `500` page goes out.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::Form(e) => {
                tracing::warn!(error = %e, "rejecting malformed form body");
                Response::builder()
                    .status(Status::BadRequest)
                    .text("Bad Request")
            }
            e => {
                tracing::error!(error = %e, source = ?std::error::Error::source(&e), "request handling failed");
                Response::builder()
                    .status(Status::InternalServerError)
                    .html("<h1>Internal Server Error</h1>")
            }
        }
    }
}

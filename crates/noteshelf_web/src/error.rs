//! Request failure mapping.
//!
//! Store failures fail the request with 500; details go to the log only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use noteshelf_core::{NoteServiceError, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum WebError {
    Service(NoteServiceError),
    /// The blocking task was cancelled or panicked.
    Worker(String),
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Worker(message) => write!(f, "blocking worker failed: {message}"),
        }
    }
}

impl Error for WebError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteServiceError> for WebError {
    fn from(value: NoteServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for WebError {
    fn from(value: RepoError) -> Self {
        Self::Service(value.into())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!("event=http_error module=web status=error error={self}");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
    }
}

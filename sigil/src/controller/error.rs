//! Errors that can be returned by a controller.
//!
//! Conversions exist from the errors controllers usually run into, so the `?`
//! operator works. Anything else can be boxed into [`Error::Error`].
use crate::http::Error as HttpError;
use thiserror::Error;

/// A controller error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("session error: {0}")]
    SessionError(#[from] crate::session::Error),

    #[error("http error: {0}")]
    HttpError(Box<HttpError>),

    #[error("{0}")]
    Error(#[from] Box<dyn std::error::Error + Sync + Send>),
}

impl From<HttpError> for Error {
    fn from(error: HttpError) -> Self {
        Error::HttpError(Box::new(error))
    }
}

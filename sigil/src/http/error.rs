use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request: {0}")]
    MalformedRequest(&'static str),

    #[error("request head exceeds {0} bytes")]
    HeaderTooLarge(usize),

    #[error("request body of {0} bytes is too large")]
    ContentTooLarge(usize),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Session(#[from] crate::session::Error),

    #[error("not authorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,
}

impl Error {
    /// HTTP status code this error maps to.
    pub fn code(&self) -> u16 {
        match self {
            Self::MalformedRequest(_) => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::ContentTooLarge(_) => 413,
            Self::HeaderTooLarge(_) => 431,
            _ => 500,
        }
    }
}

//! Types and traits needed to write controllers, in one import:
//!
//! ```
//! use sigil::prelude::*;
//! ```
pub use crate::config::Config;
pub use crate::controller::{
    AllowAll, AuthHandler, Authentication, Controller, Error, SessionAuth,
};
pub use crate::http::{Cookie, CookieBuilder, Method, Request, Response, Server};
pub use crate::logging::Logger;
pub use crate::session::{Session, SessionState};

/// A macro to easily implement async traits methods.
pub use async_trait::async_trait;

pub use serde::{Deserialize, Serialize};
pub use time::{Duration, OffsetDateTime};
pub use tokio;

//! Session authentication for Sigil apps.
//!
//! Provides controllers to log a user in, check who is logged in, and log out.
//! The session is a signed cookie, so there is nothing to store server-side
//! besides the users themselves.
//!
//! ```rust,ignore
//! use sigil::prelude::*;
//! use sigil_auth::{models::MemoryStore, routes};
//!
//! let config = Config::load()?;
//! let store = Arc::new(MemoryStore::from_config(&config.users)?);
//!
//! Server::new(routes(store), &config)?.launch().await?;
//! ```
use sigil::controller::Controller;
use sigil::http::Handler;
use std::sync::Arc;

pub mod controllers;
pub mod models;

use controllers::{CheckSessionController, LoginController, LogoutController};
use models::UserStore;

/// Mount the controllers at their default paths.
///
/// | Method   | Path             |
/// |----------|------------------|
/// | `POST`   | `/login`         |
/// | `GET`    | `/check_session` |
/// | `GET`    | `/me`            |
/// | `DELETE` | `/logout`        |
pub fn routes(store: Arc<dyn UserStore>) -> Vec<Handler> {
    vec![
        LoginController::new(store.clone()).route("/login"),
        CheckSessionController::new(store.clone()).route("/check_session"),
        CheckSessionController::new(store).route("/me"),
        LogoutController.route("/logout"),
    ]
}

//! Sigil is a small HTTP framework with signed cookie sessions.
//!
//! Sessions live entirely on the client. Each one is a JSON map, signed with
//! HMAC-SHA256 using the server's secret key, and sent back and forth in a cookie.
//! The server keeps no session state, so any instance with the same key can
//! verify any session.
//!
//! # Controllers
//!
//! Requests are handled by controllers, structs implementing the [`controller::Controller`] trait:
//!
//! ```rust
//! use sigil::prelude::*;
//!
//! struct Whoami;
//!
//! #[sigil::async_trait]
//! impl Controller for Whoami {
//!     async fn handle(&self, request: &Request) -> Result<Response, Error> {
//!         match request.user_id() {
//!             Some(id) => Ok(Response::new().text(id)),
//!             None => Ok(Response::unauthorized()),
//!         }
//!     }
//! }
//! ```
//!
//! # HTTP server
//!
//! Routes are mapped to controllers when the server is created:
//!
//! ```rust,ignore
//! use sigil::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     Logger::init();
//!     let config = Config::load()?;
//!
//!     Server::new(vec![Whoami.route("/whoami")], &config)?
//!         .launch()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
pub mod colors;
pub mod config;
pub mod controller;
pub mod http;
pub mod logging;
pub mod prelude;
pub mod session;

/// Wrapper around async traits to make them easy to use.
pub use async_trait::async_trait;
/// Serde is used for (de)serialization.
pub use serde;
/// Tokio is an asynchronous runtime for Rust.
pub use tokio;

//! Moves sessions between requests, responses and cookies.
use time::{Duration, OffsetDateTime};

use super::{Error, Session, SessionState, Signer};
use crate::config::{Config, SessionConfig};
use crate::http::{Cookie, CookieBuilder, Cookies};

/// What a response does to the client's session cookie.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionChange {
    /// Sign the session and send it to the client.
    Set(Session),
    /// Tell the client to delete the cookie.
    Clear,
}

/// Reads the session from request cookies and writes it back
/// to the client with `Set-Cookie`.
#[derive(Debug, Clone)]
pub struct SessionManager {
    signer: Signer,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(signer: Signer, config: SessionConfig) -> Self {
        Self { signer, config }
    }

    /// Build the session manager using the configured secret key.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Self::new(
            Signer::new(&config.general.secret_key)?,
            config.session.clone(),
        ))
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the session sent by the client.
    pub fn load(&self, cookies: &Cookies) -> SessionState {
        match cookies.get(&self.config.cookie_name) {
            Some(cookie) => self.signer.decode(cookie.value()),
            None => SessionState::Absent,
        }
    }

    /// Create the `Set-Cookie` cookie for this change.
    pub fn cookie(&self, change: &SessionChange) -> Result<Cookie, Error> {
        let builder = CookieBuilder::new()
            .name(&self.config.cookie_name)
            .path("/")
            .http_only()
            .lax();

        let builder = if self.config.secure {
            builder.secure()
        } else {
            builder
        };

        let cookie = match change {
            SessionChange::Set(session) => {
                let builder = builder.value(self.signer.encode(session)?);
                match self.config.max_age() {
                    Some(max_age) => builder.max_age(max_age),
                    None => builder,
                }
                .build()
            }

            SessionChange::Clear => builder
                .value("")
                .max_age(Duration::ZERO)
                .expiration(OffsetDateTime::UNIX_EPOCH)
                .build(),
        };

        Ok(cookie)
    }
}

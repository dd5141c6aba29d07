//! Request authentication.
//!
//! Controllers pick an authentication mechanism by returning an [`AuthHandler`] from
//! [`super::Controller::auth`]. Requests that aren't authorized never reach the controller.
use super::Error;
use crate::http::{Request, Response};

use async_trait::async_trait;
use std::sync::Arc;

/// An authentication mechanism wrapper that can be attached to a controller.
#[derive(Clone)]
pub struct AuthHandler {
    auth: Arc<dyn Authentication>,
}

impl Default for AuthHandler {
    fn default() -> Self {
        Self::new(AllowAll)
    }
}

impl AuthHandler {
    /// Create new authentication mechanism using the provided authentication method.
    pub fn new(auth: impl Authentication + 'static) -> Self {
        AuthHandler {
            auth: Arc::new(auth),
        }
    }

    /// Get the authentication method.
    pub fn auth(&self) -> &dyn Authentication {
        self.auth.as_ref()
    }
}

/// Authenticators need to implement this trait.
#[async_trait]
#[allow(unused_variables)]
pub trait Authentication: Sync + Send {
    /// Allow or deny the request.
    async fn authorize(&self, request: &Request) -> Result<bool, Error>;

    /// Response for denied requests. Default is `403 - Forbidden`.
    async fn denied(&self, request: &Request) -> Result<Response, Error> {
        Ok(Response::forbidden())
    }

    fn handler(self) -> AuthHandler
    where
        Self: Sized + 'static,
    {
        AuthHandler::new(self)
    }
}

/// Allow all requests. This is the default for all controllers.
pub struct AllowAll;

#[async_trait]
impl Authentication for AllowAll {
    async fn authorize(&self, _request: &Request) -> Result<bool, Error> {
        Ok(true)
    }
}

/// Require a verified session authenticated to a user.
///
/// Missing, tampered and anonymous sessions are all denied with `401 - Unauthorized`.
#[derive(Default)]
pub struct SessionAuth;

#[async_trait]
impl Authentication for SessionAuth {
    async fn authorize(&self, request: &Request) -> Result<bool, Error> {
        Ok(request.session().authenticated())
    }

    async fn denied(&self, _request: &Request) -> Result<Response, Error> {
        Ok(Response::unauthorized())
    }
}

//! Controllers handle requests routed to them by the server.
use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::{debug, error};

pub mod auth;
pub mod error;

pub use auth::{AllowAll, AuthHandler, Authentication, SessionAuth};
pub use error::Error;

use crate::http::{Handler, Request, Response};

static DEFAULT_AUTH: Lazy<AuthHandler> = Lazy::new(AuthHandler::default);

/// The HTTP controller.
///
/// Handles all requests which match the path it's mounted at.
/// Authentication is built-in and runs before [`Controller::handle`].
///
/// # Example
///
/// ```
/// use sigil::prelude::*;
///
/// struct Ping;
///
/// #[async_trait]
/// impl Controller for Ping {
///     async fn handle(&self, _request: &Request) -> Result<Response, Error> {
///         Ok(Response::new().text("pong"))
///     }
/// }
///
/// let handler = Ping.route("/ping");
/// ```
#[async_trait]
pub trait Controller: Sync + Send {
    /// Authentication mechanism for this controller. All requests are allowed by default.
    fn auth(&self) -> &AuthHandler {
        &DEFAULT_AUTH
    }

    /// Mount the controller at this path.
    fn route(self, path: &str) -> Handler
    where
        Self: Sized + 'static,
    {
        Handler::route(path, self)
    }

    /// Run authentication and the controller. Errors are turned into
    /// responses here; only authentication failures are returned.
    async fn handle_internal(&self, request: &Request) -> Result<Response, Error> {
        let auth = self.auth();

        if !auth.auth().authorize(request).await? {
            return auth.auth().denied(request).await;
        }

        match self.handle(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                let response = match err {
                    Error::HttpError(ref err) => Response::from_error(err),
                    _ => Response::internal_error(),
                };

                if response.status().code() >= 500 {
                    error!("{}: {}", self.controller_name(), err);
                } else {
                    debug!("{}: {}", self.controller_name(), err);
                }

                Ok(response)
            }
        }
    }

    /// Handle the request. Implement this to define how your controller
    /// responds.
    async fn handle(&self, request: &Request) -> Result<Response, Error>;

    /// The name of this controller. Used for logging.
    fn controller_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::Error as HttpError;
    use crate::session::{Session, SessionState};

    struct Failing;

    #[async_trait]
    impl Controller for Failing {
        async fn handle(&self, request: &Request) -> Result<Response, Error> {
            match request.path().base() {
                "/unauthorized" => Err(HttpError::Unauthorized.into()),
                "/json" => Err(serde_json::from_str::<i64>("nope").unwrap_err().into()),
                _ => Ok(Response::new()),
            }
        }
    }

    struct Protected {
        auth: AuthHandler,
    }

    #[async_trait]
    impl Controller for Protected {
        fn auth(&self) -> &AuthHandler {
            &self.auth
        }

        async fn handle(&self, request: &Request) -> Result<Response, Error> {
            Ok(Response::new().text(request.user_id_required()?))
        }
    }

    async fn request(path: &str) -> Request {
        let raw = format!("GET {} HTTP/1.1\r\n\r\n", path);
        crate::http::request::test::request(&raw, &crate::http::request::test::sessions())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_errors_to_responses() {
        let response = Failing
            .handle_internal(&request("/unauthorized").await)
            .await
            .unwrap();
        assert_eq!(response.status().code(), 401);

        // Internal details stay in the logs.
        let response = Failing.handle_internal(&request("/json").await).await.unwrap();
        assert_eq!(response.status().code(), 500);
        assert!(!String::from_utf8_lossy(response.get_body().as_bytes()).contains("nope"));
    }

    #[tokio::test]
    async fn test_auth_runs_first() {
        let controller = Protected {
            auth: SessionAuth.handler(),
        };

        let response = controller
            .handle_internal(&Request::default())
            .await
            .unwrap();
        assert_eq!(response.status().code(), 401);

        let request =
            Request::default().with_session(SessionState::Valid(Session::authenticated(12)));
        let response = controller.handle_internal(&request).await.unwrap();
        assert_eq!(response.get_body().as_bytes(), b"12");
    }
}

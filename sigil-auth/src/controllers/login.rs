//! Login controller.
//!
//! Accepts `{"username": "..."}` and, if the user exists, starts
//! an authenticated session for them.
use serde::Deserialize;
use sigil::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::UserStore;

#[derive(Deserialize)]
struct LoginForm {
    username: String,
}

/// Log the user in.
pub struct LoginController {
    store: Arc<dyn UserStore>,
}

impl LoginController {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Controller for LoginController {
    async fn handle(&self, request: &Request) -> Result<Response, Error> {
        if request.method() != &Method::Post {
            return Ok(Response::method_not_allowed("POST"));
        }

        let form = match request.json::<LoginForm>() {
            Ok(form) => form,
            Err(err) => {
                debug!("login: bad request body: {}", err);
                return Ok(Response::bad_request());
            }
        };

        let username = form.username.trim();
        if username.is_empty() {
            return Ok(Response::bad_request());
        }

        match self.store.find_by_username(username) {
            Some(user) => {
                info!("user \"{}\" (id {}) logged in", user.username, user.id);
                Ok(request.login(user.id).json(&user)?)
            }

            None => {
                info!("login failed for unknown user \"{}\"", username);
                Ok(Response::unauthorized())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::controllers::test::{request, sessions, store};
    use sigil::session::{SessionChange, SessionState};

    fn login(body: &str) -> String {
        format!(
            "POST /login HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn test_login() {
        let sessions = sessions();
        let controller = LoginController::new(store());

        let request = request(&login(r#"{"username":"ada"}"#), &sessions).await;
        let response = controller.handle_internal(&request).await.unwrap();

        assert_eq!(response.status().code(), 200);
        assert_eq!(
            response.get_body().as_bytes(),
            br#"{"id":1,"username":"ada"}"#
        );

        let session = match response.session() {
            Some(SessionChange::Set(session)) => session.clone(),
            other => panic!("expected a session, got {:?}", other),
        };
        assert_eq!(session.user_id(), Some(1));

        // The cookie the client gets back verifies.
        let cookie = sessions.cookie(&SessionChange::Set(session)).unwrap();
        assert_eq!(sessions.signer().decode(cookie.value()).user_id(), Some(1));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let sessions = sessions();
        let controller = LoginController::new(store());

        for body in [r#"{"username":"mallory"}"#, r#"{"username":"ADA"}"#] {
            let request = request(&login(body), &sessions).await;
            let response = controller.handle_internal(&request).await.unwrap();

            assert_eq!(response.status().code(), 401);
            assert!(response.session().is_none());
        }
    }

    #[tokio::test]
    async fn test_bad_request() {
        let sessions = sessions();
        let controller = LoginController::new(store());

        for body in ["", "{}", "not json", r#"{"username":"   "}"#, r#"{"username":1}"#] {
            let request = request(&login(body), &sessions).await;
            let response = controller.handle_internal(&request).await.unwrap();
            assert_eq!(response.status().code(), 400, "body: {}", body);
            assert!(response.session().is_none());
        }
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let sessions = sessions();
        let controller = LoginController::new(store());

        let request = request("GET /login HTTP/1.1\r\n\r\n", &sessions).await;
        let response = controller.handle_internal(&request).await.unwrap();
        assert_eq!(response.status().code(), 405);
        assert_eq!(response.headers().get("allow"), Some(&"POST".to_string()));
    }

    #[tokio::test]
    async fn test_switch_user() {
        let sessions = sessions();
        let controller = LoginController::new(store());

        let request = request(&login(r#"{"username":"grace"}"#), &sessions)
            .await
            .with_session(SessionState::Valid(sigil::session::Session::authenticated(1)));
        let response = controller.handle_internal(&request).await.unwrap();

        match response.session() {
            Some(SessionChange::Set(session)) => assert_eq!(session.user_id(), Some(2)),
            other => panic!("expected a session, got {:?}", other),
        }
    }
}

//! Session check controller.
//!
//! Mounted at `/check_session` and `/me`. Returns the logged in user,
//! or `401 - Unauthorized` if there isn't one.
use sigil::prelude::*;
use std::sync::Arc;
use tracing::debug;

use crate::models::UserStore;

/// Return the user the session is authenticated to.
pub struct CheckSessionController {
    store: Arc<dyn UserStore>,
    auth: AuthHandler,
}

impl CheckSessionController {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            auth: SessionAuth.handler(),
        }
    }
}

#[async_trait]
impl Controller for CheckSessionController {
    fn auth(&self) -> &AuthHandler {
        &self.auth
    }

    async fn handle(&self, request: &Request) -> Result<Response, Error> {
        if request.method() != &Method::Get {
            return Ok(Response::method_not_allowed("GET"));
        }

        let user_id = request.user_id_required()?;

        match self.store.find(user_id) {
            Some(user) => Ok(Response::new().json(&user)?),
            None => {
                // Signed by us, but the user is gone.
                debug!("session for unknown user id {}", user_id);
                Ok(Response::unauthorized())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::controllers::test::{request, request_as, sessions, store};
    use crate::models::MemoryStore;

    #[tokio::test]
    async fn test_check_session() {
        let sessions = sessions();
        let controller = CheckSessionController::new(store());

        let request = request_as("GET", "/check_session", 2, &sessions).await;
        let first = controller.handle_internal(&request).await.unwrap();
        let second = controller.handle_internal(&request).await.unwrap();

        assert_eq!(first.status().code(), 200);
        assert_eq!(
            first.get_body().as_bytes(),
            br#"{"id":2,"username":"grace"}"#
        );
        assert_eq!(first.get_body().as_bytes(), second.get_body().as_bytes());

        // Checking doesn't touch the cookie.
        assert!(first.session().is_none());
    }

    #[tokio::test]
    async fn test_not_authorized() {
        let sessions = sessions();
        let controller = CheckSessionController::new(store());

        let token = sessions
            .signer()
            .encode(&Session::authenticated(1))
            .unwrap();
        let mut tampered = token.into_bytes();
        tampered[2] ^= 0x01;
        let tampered = String::from_utf8(tampered).unwrap();

        for raw in [
            "GET /me HTTP/1.1\r\n\r\n".to_string(),
            "GET /me HTTP/1.1\r\nCookie: sigil_session=\r\n\r\n".to_string(),
            "GET /me HTTP/1.1\r\nCookie: sigil_session=garbage\r\n\r\n".to_string(),
            format!("GET /me HTTP/1.1\r\nCookie: sigil_session={}\r\n\r\n", tampered),
        ] {
            let request = request(&raw, &sessions).await;
            let response = controller.handle_internal(&request).await.unwrap();
            assert_eq!(response.status().code(), 401);
            assert_eq!(
                response.get_body().as_bytes(),
                br#"{"error":"not authorized"}"#
            );
        }
    }

    #[tokio::test]
    async fn test_deleted_user() {
        let sessions = sessions();
        let controller = CheckSessionController::new(Arc::new(MemoryStore::new()));

        let request = request_as("GET", "/me", 1, &sessions).await;
        let response = controller.handle_internal(&request).await.unwrap();
        assert_eq!(response.status().code(), 401);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let sessions = sessions();
        let controller = CheckSessionController::new(store());

        let request = request_as("POST", "/me", 1, &sessions).await;
        let response = controller.handle_internal(&request).await.unwrap();
        assert_eq!(response.status().code(), 405);
    }
}

//! Logout controller.
use sigil::prelude::*;
use tracing::info;

/// Log the user out.
///
/// Always succeeds, even if there is no session to log out of.
#[derive(Default)]
pub struct LogoutController;

#[async_trait]
impl Controller for LogoutController {
    async fn handle(&self, request: &Request) -> Result<Response, Error> {
        if request.method() != &Method::Delete {
            return Ok(Response::method_not_allowed("DELETE"));
        }

        if let Some(user_id) = request.user_id() {
            info!("user id {} logged out", user_id);
        }

        Ok(request.logout())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::controllers::test::{request, request_as, sessions};
    use sigil::session::SessionChange;

    #[tokio::test]
    async fn test_logout() {
        let sessions = sessions();

        let request = request_as("DELETE", "/logout", 1, &sessions).await;
        let response = LogoutController.handle_internal(&request).await.unwrap();

        assert_eq!(response.status().code(), 204);
        assert_eq!(response.session(), Some(&SessionChange::Clear));
    }

    #[tokio::test]
    async fn test_idempotent() {
        let sessions = sessions();

        for raw in [
            "DELETE /logout HTTP/1.1\r\n\r\n",
            "DELETE /logout HTTP/1.1\r\nCookie: sigil_session=forged.sig\r\n\r\n",
        ] {
            let request = request(raw, &sessions).await;
            let response = LogoutController.handle_internal(&request).await.unwrap();
            assert_eq!(response.status().code(), 204);
            assert_eq!(response.session(), Some(&SessionChange::Clear));
        }
    }

    #[tokio::test]
    async fn test_keeps_other_fields() {
        let sessions = sessions();

        let mut session = Session::authenticated(1);
        session.insert("theme", "dark");
        let token = sessions.signer().encode(&session).unwrap();
        let raw = format!(
            "DELETE /logout HTTP/1.1\r\nCookie: sigil_session={}\r\n\r\n",
            token
        );

        let request = request(&raw, &sessions).await;
        let response = LogoutController.handle_internal(&request).await.unwrap();

        match response.session() {
            Some(SessionChange::Set(session)) => {
                assert_eq!(session.user_id(), None);
                assert_eq!(session.get("theme"), Some(&"dark".into()));
            }
            other => panic!("expected a session, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let sessions = sessions();
        let request = request("POST /logout HTTP/1.1\r\n\r\n", &sessions).await;
        let response = LogoutController.handle_internal(&request).await.unwrap();
        assert_eq!(response.status().code(), 405);
    }
}

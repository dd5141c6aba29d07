//! HTTP request.
use std::marker::Unpin;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{Cookies, Error, Head, Response};
use crate::config::Http;
use crate::session::{SessionManager, SessionState};

/// HTTP request.
///
/// The request is fully loaded into memory. It's cheap to clone
/// since the body is behind an [`std::sync::Arc`].
#[derive(Debug, Clone)]
pub struct Request {
    head: Head,
    session: SessionState,
    inner: Arc<Inner>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            head: Head::default(),
            session: SessionState::Absent,
            inner: Arc::new(Inner::default()),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    body: Vec<u8>,
    cookies: Cookies,
    peer: Option<SocketAddr>,
}

impl Request {
    /// Read the request in its entirety from a stream and load the session
    /// from its cookie.
    pub async fn read(
        peer: SocketAddr,
        mut stream: impl AsyncRead + Unpin,
        http: &Http,
        sessions: &SessionManager,
    ) -> Result<Self, Error> {
        let head = Head::read(&mut stream, http.header_max_size).await?;
        let content_length = head.content_length()?;

        if content_length > http.body_max_size {
            return Err(Error::ContentTooLarge(content_length));
        }

        let mut body = vec![0u8; content_length];
        stream
            .read_exact(&mut body)
            .await
            .map_err(|_| Error::MalformedRequest("incorrect content length"))?;

        let cookies = head.cookies();
        let session = sessions.load(&cookies);

        Ok(Request {
            head,
            session,
            inner: Arc::new(Inner {
                body,
                cookies,
                peer: Some(peer),
            }),
        })
    }

    /// Get the request's source IP address.
    pub fn peer(&self) -> Option<&SocketAddr> {
        self.inner.peer.as_ref()
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    /// Request's body as bytes.
    pub fn body(&self) -> &[u8] {
        &self.inner.body
    }

    /// Request's body deserialized from JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(self.body())
    }

    /// Request's cookies.
    pub fn cookies(&self) -> &Cookies {
        &self.inner.cookies
    }

    /// The session sent by the client.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Replace the request session.
    pub fn with_session(mut self, session: SessionState) -> Self {
        self.session = session;
        self
    }

    /// The authenticated user's ID, if the session is valid and has one.
    pub fn user_id(&self) -> Option<i64> {
        self.session.user_id()
    }

    /// The authenticated user's ID. Returns [`Error::Unauthorized`] if there isn't one.
    pub fn user_id_required(&self) -> Result<i64, Error> {
        self.user_id().ok_or(Error::Unauthorized)
    }

    /// Authenticate the session to this user.
    ///
    /// Other session fields are kept. If the session sent by the client didn't
    /// verify, a new one is started.
    pub fn login(&self, user_id: i64) -> Response {
        let mut session = self.session.to_session();
        session.set_user_id(user_id);
        Response::new().set_session(session)
    }

    /// Log the user out.
    ///
    /// Removes the user from the session and responds with `204 No Content`.
    /// If nothing else is left in the session, the client is told to delete the cookie.
    pub fn logout(&self) -> Response {
        let mut session = self.session.to_session();
        session.remove_user_id();

        if session.is_empty() {
            Response::no_content().clear_session()
        } else {
            Response::no_content().set_session(session)
        }
    }
}

impl Deref for Request {
    type Target = Head;

    fn deref(&self) -> &Self::Target {
        &self.head
    }
}

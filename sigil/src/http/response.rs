//! HTTP response.
use serde::Serialize;
use std::marker::Unpin;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{head::Version, Body, Cookie, Cookies, Error, Headers};
use crate::session::{Session, SessionChange, SessionManager};

/// Response status, e.g. 404, 200, etc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    Ok,
    NoContent,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    ContentTooLarge,
    InternalServerError,
    Code(u16),
}

impl Status {
    pub fn code(&self) -> u16 {
        use Status::*;

        match self {
            Ok => 200,
            NoContent => 204,
            BadRequest => 400,
            Unauthorized => 401,
            Forbidden => 403,
            NotFound => 404,
            MethodNotAllowed => 405,
            ContentTooLarge => 413,
            InternalServerError => 500,
            Code(code) => *code,
        }
    }

    /// Reason phrase sent on the status line.
    pub fn reason(&self) -> &'static str {
        match self.code() {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            302 => "Found",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            413 => "Content Too Large",
            431 => "Request Header Fields Too Large",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            _ => "",
        }
    }
}

impl From<u16> for Status {
    fn from(code: u16) -> Status {
        use Status::*;

        match code {
            200 => Ok,
            204 => NoContent,
            400 => BadRequest,
            401 => Unauthorized,
            403 => Forbidden,
            404 => NotFound,
            405 => MethodNotAllowed,
            413 => ContentTooLarge,
            500 => InternalServerError,
            code => Code(code),
        }
    }
}

/// HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    code: u16,
    headers: Headers,
    version: Version,
    body: Body,
    cookies: Cookies,
    session: Option<SessionChange>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Create empty `200 OK` response.
    pub fn new() -> Self {
        let mut headers = Headers::new();
        headers.insert("content-type", "text/plain; charset=utf-8");
        headers.insert("content-length", 0);
        headers.insert("server", "sigil");

        Self {
            code: 200,
            headers,
            body: Body::default(),
            version: Version::Http11,
            cookies: Cookies::new(),
            session: None,
        }
    }

    /// Set the body. `Content-Type` and `Content-Length` follow it.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self.headers.insert("content-length", self.body.len());
        self.headers.insert("content-type", self.body.mime_type());
        self
    }

    /// Response status, e.g. 200 OK.
    pub fn status(&self) -> Status {
        self.code.into()
    }

    /// Set response code.
    ///
    /// # Example
    ///
    /// ```
    /// use sigil::http::Response;
    ///
    /// let response = Response::new().text("OK").code(200);
    /// ```
    pub fn code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Create a response with a JSON body serialized from a Rust type.
    ///
    /// # Example
    ///
    /// ```
    /// use sigil::http::Response;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct User {
    ///     id: i64,
    /// }
    ///
    /// let response = Response::new().json(User { id: 1 }).unwrap();
    /// assert_eq!(response.get_body().as_bytes(), br#"{"id":1}"#);
    /// ```
    pub fn json(self, body: impl Serialize) -> Result<Self, Error> {
        let body = serde_json::to_vec(&body)?;
        Ok(self.body(Body::Json(body)))
    }

    /// Create a response with a plain text body.
    pub fn text(self, body: impl ToString) -> Self {
        self.body(Body::Text(body.to_string()))
    }

    /// Add a header to the response. The name is lowercased, the value is set as-is.
    pub fn header(mut self, name: impl ToString, value: impl ToString) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn get_body(&self) -> &Body {
        &self.body
    }

    /// Mutable reference to response cookies.
    pub fn cookies(&mut self) -> &mut Cookies {
        &mut self.cookies
    }

    /// Send a cookie to the client.
    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.add(cookie);
        self
    }

    /// Send this session to the client.
    pub fn set_session(mut self, session: Session) -> Self {
        self.session = Some(SessionChange::Set(session));
        self
    }

    /// Delete the client's session cookie.
    pub fn clear_session(mut self) -> Self {
        self.session = Some(SessionChange::Clear);
        self
    }

    /// Session change requested by the controller, if any.
    pub fn session(&self) -> Option<&SessionChange> {
        self.session.as_ref()
    }

    /// Sign the pending session change into a `Set-Cookie` header.
    ///
    /// Called by the server before the response is sent.
    pub fn finish(mut self, sessions: &SessionManager) -> Result<Self, Error> {
        if let Some(ref change) = self.session {
            let cookie = sessions.cookie(change)?;
            self.cookies.add(cookie);
        }

        Ok(self)
    }

    /// Set the `Connection` header.
    pub fn keep_alive(self, keep_alive: bool) -> Self {
        self.header("connection", if keep_alive { "keep-alive" } else { "close" })
    }

    /// Serialize the response to a stream. The stream isn't flushed.
    pub async fn send(&self, mut stream: impl AsyncWrite + Unpin) -> Result<(), std::io::Error> {
        let status = self.status();
        let mut response = format!("{} {} {}\r\n", self.version, status.code(), status.reason())
            .as_bytes()
            .to_vec();

        response.extend_from_slice(&self.headers.to_bytes());
        response.extend_from_slice(&self.cookies.to_headers());
        response.extend_from_slice(b"\r\n");

        stream.write_all(&response).await?;
        self.body.send(stream).await
    }

    /// JSON error body shared by all error responses.
    fn error(code: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self::new().body(Body::Json(body.into_bytes())).code(code)
    }

    /// `204 No Content`. Carries no body and no `Content-Length`.
    pub fn no_content() -> Self {
        let mut response = Self::new().code(204);
        response.headers.remove("content-length");
        response.headers.remove("content-type");
        response
    }

    pub fn bad_request() -> Self {
        Self::error(400, "bad request")
    }

    pub fn unauthorized() -> Self {
        Self::error(401, "not authorized")
    }

    pub fn forbidden() -> Self {
        Self::error(403, "forbidden")
    }

    pub fn not_found() -> Self {
        Self::error(404, "not found")
    }

    /// `405 Method Not Allowed`, listing the methods that are.
    pub fn method_not_allowed(allow: &str) -> Self {
        Self::error(405, "method not allowed").header("allow", allow)
    }

    pub fn content_too_large() -> Self {
        Self::error(413, "content too large")
    }

    /// `500 Internal Server Error`.
    ///
    /// The error is not included in the response, log it instead.
    pub fn internal_error() -> Self {
        Self::error(500, "internal server error")
    }

    /// Response for an HTTP error, mapped to its status code.
    pub fn from_error(err: &Error) -> Self {
        match err.code() {
            400 => Self::bad_request(),
            401 => Self::unauthorized(),
            403 => Self::forbidden(),
            413 => Self::content_too_large(),
            code @ 431 => Self::error(code, "request header fields too large"),
            _ => Self::internal_error(),
        }
    }
}

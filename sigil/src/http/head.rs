//! Request head: HTTP method, path, version and headers.
use std::marker::Unpin;

use tokio::io::{AsyncRead, AsyncReadExt};

use super::{Cookies, Error, Headers, Path};

/// HTTP method, e.g. GET, POST, etc.
#[derive(PartialEq, Clone, Debug, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Patch,
    Options,
    /// Some other request we don't have a name for.
    Other(String),
}

impl From<&str> for Method {
    fn from(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "HEAD" => Method::Head,
            "PATCH" => Method::Patch,
            "OPTIONS" => Method::Options,
            _ => Method::Other(value.to_string()),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Method::*;

        let name = match self {
            Get => "GET",
            Post => "POST",
            Put => "PUT",
            Delete => "DELETE",
            Head => "HEAD",
            Patch => "PATCH",
            Options => "OPTIONS",
            Other(other) => other.as_str(),
        };

        write!(f, "{}", name)
    }
}

/// HTTP version. Only HTTP/1.x is spoken.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Version {
    Http10,
    #[default]
    Http11,
}

impl TryFrom<&str> for Version {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "HTTP/1.1" => Ok(Version::Http11),
            "HTTP/1.0" => Ok(Version::Http10),
            _ => Err(Error::MalformedRequest("unsupported http version")),
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Version::Http10 => write!(f, "HTTP/1.0"),
            Version::Http11 => write!(f, "HTTP/1.1"),
        }
    }
}

/// Request HTTP method, path, HTTP version and headers.
#[derive(Debug, Clone, Default)]
pub struct Head {
    method: Method,
    path: Path,
    version: Version,
    headers: Headers,
}

impl Head {
    /// Read request head from a stream.
    ///
    /// The whole head, request line and headers included, must fit in `max_size` bytes.
    pub async fn read(mut stream: impl AsyncRead + Unpin, max_size: usize) -> Result<Self, Error> {
        let mut bytes_remaining = max_size;

        let line = Self::read_line(&mut stream, &mut bytes_remaining, max_size).await?;
        let mut request = line.split(' ').filter(|s| !s.is_empty());

        let method = Method::from(request.next().ok_or(Error::MalformedRequest("method"))?);
        let path = Path::parse(request.next().ok_or(Error::MalformedRequest("path"))?)?;
        let version =
            Version::try_from(request.next().ok_or(Error::MalformedRequest("version"))?)?;

        let mut headers = Headers::new();

        loop {
            let header = Self::read_line(&mut stream, &mut bytes_remaining, max_size).await?;
            if header.is_empty() {
                break;
            }

            let (name, value) = header
                .split_once(':')
                .ok_or(Error::MalformedRequest("header"))?;
            headers.insert(name.trim(), value.trim());
        }

        Ok(Head {
            method,
            path,
            version,
            headers,
        })
    }

    /// Parse cookies sent by the client.
    pub fn cookies(&self) -> Cookies {
        if let Some(cookie) = self.headers.get("cookie") {
            Cookies::parse(cookie)
        } else {
            Cookies::default()
        }
    }

    /// Get the request path, e.g. `/login`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Request method, e.g. `GET`, `POST`, etc.
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The size of the request body in bytes, from the `Content-Length` header.
    pub fn content_length(&self) -> Result<usize, Error> {
        match self.headers.get("content-length") {
            Some(cl) => cl
                .parse::<usize>()
                .map_err(|_| Error::MalformedRequest("content-length")),
            None => Ok(0),
        }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get a header value by name, if it exists. Case insensitive.
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    /// Should the connection stay open after the response?
    ///
    /// HTTP/1.1 connections are persistent unless the client says otherwise,
    /// HTTP/1.0 ones only if the client asks.
    pub fn keep_alive(&self) -> bool {
        let connection = self
            .headers
            .get("connection")
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match self.version {
            Version::Http11 => !connection.contains("close"),
            Version::Http10 => connection.contains("keep-alive"),
        }
    }

    /// Read a line from the stream, without the trailing \r\n.
    async fn read_line(
        mut stream: impl AsyncRead + Unpin,
        bytes_remaining: &mut usize,
        max_size: usize,
    ) -> Result<String, Error> {
        let mut buf = Vec::new();

        loop {
            if *bytes_remaining == 0 {
                return Err(Error::HeaderTooLarge(max_size));
            }

            // `stream` should be buffered.
            let b = stream.read_u8().await?;
            *bytes_remaining -= 1;

            match b {
                b'\n' => break,
                b'\r' => {
                    if stream.read_u8().await? != b'\n' {
                        return Err(Error::MalformedRequest("cr without lf"));
                    }
                    *bytes_remaining = bytes_remaining.saturating_sub(1);
                    break;
                }
                b => buf.push(b),
            }
        }

        // Header values are opaque to us. Bytes that aren't UTF-8 are replaced
        // so a mangled cookie fails verification instead of failing the request.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_read_line() {
        let line = b"Content-Type: application/json\r\n";
        let mut remaining = 4096;
        let result = Head::read_line(&line[..], &mut remaining, 4096)
            .await
            .expect("read_line");
        assert_eq!(result, "Content-Type: application/json");
        assert_eq!(remaining, 4096 - line.len());
    }

    #[tokio::test]
    async fn test_parse_head() {
        let body = ("POST /login?next=/ HTTP/1.1\r\n".to_owned()
            + "Host: localhost:8000\r\n"
            + "Content-Type: application/json\r\n"
            + "Content-Length: 4\r\n"
            + "Cookie: sigil_session=abc.def; theme=dark\r\n"
            + "\r\n"
            + "null")
            .as_bytes()
            .to_vec();
        let head = Head::read(&body[..], 4096).await.expect("head");
        assert_eq!(head.method(), &Method::Post);
        assert_eq!(head.path().base(), "/login");
        assert_eq!(head.version(), &Version::Http11);
        assert_eq!(head.content_length().unwrap(), 4);
        assert_eq!(head.header("HOST"), Some(&String::from("localhost:8000")));
        assert_eq!(head.cookies().get("theme").unwrap().value(), "dark");
        assert!(head.keep_alive());
    }

    #[tokio::test]
    async fn test_connection_close() {
        let body = b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n";
        let head = Head::read(&body[..], 4096).await.unwrap();
        assert!(!head.keep_alive());

        let body = b"GET / HTTP/1.0\r\n\r\n";
        let head = Head::read(&body[..], 4096).await.unwrap();
        assert!(!head.keep_alive());
    }

    #[tokio::test]
    async fn test_non_utf8_header() {
        let mut body = b"GET /me HTTP/1.1\r\nCookie: sigil_session=".to_vec();
        body.extend_from_slice(&[0xe5, b'y', 0xff]);
        body.extend_from_slice(b"\r\n\r\n");

        let head = Head::read(&body[..], 4096).await.expect("head");
        assert_eq!(
            head.cookies().get("sigil_session").unwrap().value(),
            "\u{fffd}y\u{fffd}"
        );
    }

    #[tokio::test]
    async fn test_too_large() {
        let body = b"GET / HTTP/1.1\r\nX-Padding: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n\r\n";
        let err = Head::read(&body[..], 32).await.expect_err("too large");
        assert!(matches!(err, Error::HeaderTooLarge(32)));
    }

    #[tokio::test]
    async fn test_malformed() {
        for body in [
            &b"GET\r\n\r\n"[..],
            &b"GET / SPDY/3\r\n\r\n"[..],
            &b"GET / HTTP/1.1\r\nno colon here\r\n\r\n"[..],
            &b"GET / HTTP/1.1\rX\r\n\r\n"[..],
        ] {
            let err = Head::read(body, 4096).await.expect_err("malformed");
            assert!(matches!(err, Error::MalformedRequest(_)), "{:?}", err);
        }
    }
}

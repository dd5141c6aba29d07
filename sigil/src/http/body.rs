//! Response body.
//!
//! The `Content-Type` and `Content-Length` headers are derived from the body
//! when it's set on the [`super::Response`].
use std::marker::Unpin;
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 encoded text.
    Text(String),
    /// UTF-8 encoded JSON.
    Json(Vec<u8>),
}

impl Default for Body {
    fn default() -> Self {
        Body::Bytes(vec![])
    }
}

impl Body {
    /// Write the body to the stream. The stream isn't flushed.
    pub async fn send(&self, mut stream: impl AsyncWrite + Unpin) -> Result<(), std::io::Error> {
        stream.write_all(self.as_bytes()).await
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Bytes(bytes) | Body::Json(bytes) => bytes,
            Body::Text(text) => text.as_bytes(),
        }
    }

    /// Used in the `Content-Length` header.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Used in the `Content-Type` header.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Body::Text(_) => "text/plain; charset=utf-8",
            Body::Json(_) => "application/json",
            Body::Bytes(_) => "application/octet-stream",
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(body: Vec<u8>) -> Self {
        Self::Bytes(body)
    }
}

impl From<&[u8]> for Body {
    fn from(body: &[u8]) -> Self {
        Self::Bytes(body.to_vec())
    }
}

//! Client-side sessions.
//!
//! A session is a small map of values that lives entirely in a cookie. The server
//! keeps no session table: every request carries its own session, signed with the
//! server's secret key so it can't be modified by the client.
//!
//! Reading a session cookie always produces a [`SessionState`]. A cookie that fails
//! verification is not an error, it's [`SessionState::Invalid`], and the request is
//! treated exactly as if no cookie was sent.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

pub mod manager;
pub mod signer;

pub use manager::{SessionChange, SessionManager};
pub use signer::{generate_key, generate_key_base64, Signer, MIN_KEY_LEN};

/// Session field holding the authenticated user's identifier.
pub const USER_ID: &str = "user_id";

#[derive(Error, Debug)]
pub enum Error {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("secret key must be at least {MIN_KEY_LEN} bytes, got {0}")]
    KeyTooShort(usize),

    #[error("signature mismatch")]
    Signature,

    #[error("malformed token: {0}")]
    Malformed(&'static str),
}

/// Session fields.
///
/// Keys are kept sorted so the same fields always serialize
/// to the same bytes, and therefore the same token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    fields: BTreeMap<String, Value>,
}

impl Session {
    /// Create an empty (anonymous) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session authenticated to a user.
    pub fn authenticated(user_id: i64) -> Self {
        let mut session = Self::new();
        session.set_user_id(user_id);
        session
    }

    /// The authenticated user, if any.
    pub fn user_id(&self) -> Option<i64> {
        self.fields.get(USER_ID).and_then(Value::as_i64)
    }

    pub fn set_user_id(&mut self, user_id: i64) {
        self.fields.insert(USER_ID.to_string(), Value::from(user_id));
    }

    /// Remove the user from the session, returning their ID.
    pub fn remove_user_id(&mut self) -> Option<i64> {
        self.fields.remove(USER_ID).and_then(|v| v.as_i64())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn insert(&mut self, name: impl ToString, value: impl Into<Value>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Result of reading the session cookie from a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Cookie verified with our key.
    Valid(Session),
    /// No session cookie was sent.
    #[default]
    Absent,
    /// Cookie was sent but failed verification: tampered, truncated,
    /// or signed with a different key.
    Invalid,
}

impl SessionState {
    /// The verified session. `Absent` and `Invalid` both have none.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Valid(session) => Some(session),
            _ => None,
        }
    }

    /// The verified session, or a fresh anonymous one.
    pub fn to_session(&self) -> Session {
        self.session().cloned().unwrap_or_default()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.session().and_then(|session| session.user_id())
    }

    pub fn authenticated(&self) -> bool {
        self.user_id().is_some()
    }
}

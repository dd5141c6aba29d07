//! HTTP headers.
use std::collections::{hash_map::Iter, HashMap};

/// Case-insensitive HTTP headers.
///
/// Multiple headers with the same name aren't supported, the last one wins.
/// `Set-Cookie` is the only header that needs that, and it's written
/// separately by [`super::Cookies`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Headers {
    headers: HashMap<String, String>,
}

impl Headers {
    /// Create new empty headers storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header. The name is lowercased.
    ///
    /// # Example
    ///
    /// ```
    /// # use sigil::http::Headers;
    /// let mut headers = Headers::new();
    /// headers.insert("Content-Type", "application/json");
    /// assert_eq!(headers.get("content-type"), Some(&String::from("application/json")));
    /// ```
    pub fn insert(&mut self, name: impl ToString, value: impl ToString) {
        self.headers
            .insert(name.to_string().to_lowercase(), value.to_string());
    }

    /// Get a header value by name. Case insensitive.
    pub fn get(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }

    /// Remove a header by name. Case insensitive.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.headers.remove(&name.to_lowercase())
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.headers.iter()
    }

    /// Serialize headers for the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (name, value) in self.iter() {
            bytes.extend_from_slice(name.as_bytes());
            bytes.extend_from_slice(b": ");
            bytes.extend_from_slice(value.as_bytes());
            bytes.extend_from_slice(b"\r\n");
        }
        bytes
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(headers: HashMap<String, String>) -> Self {
        let mut result = Headers::new();
        for (name, value) in headers {
            result.insert(name, value);
        }
        result
    }
}

//! HTTP cookies.
//!
//! This module handles decoding the `Cookie` header,
//! and generating `Set-Cookie` headers.
use std::collections::HashMap;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

use super::url::urldecode;

/// Cookies storage.
#[derive(Debug, Clone, Default)]
pub struct Cookies {
    cookies: HashMap<String, Cookie>,
}

impl Cookies {
    /// Create new empty cookies storage.
    pub fn new() -> Self {
        Self {
            cookies: HashMap::new(),
        }
    }

    /// Parse cookies from the `Cookie` header.
    ///
    /// # Example
    ///
    /// ```
    /// # use sigil::http::Cookies;
    /// let cookies = Cookies::parse("sigil_session=1234; theme=dark");
    /// assert_eq!(
    ///     cookies
    ///         .get("theme")
    ///         .unwrap()
    ///         .value(),
    ///     "dark"
    /// );
    /// ```
    pub fn parse(value: &str) -> Cookies {
        let mut cookies = HashMap::new();

        for part in value.split(';') {
            if let Some(cookie) = Cookie::parse(part.trim()) {
                // First one wins, browsers send the most specific path first.
                cookies.entry(cookie.name.clone()).or_insert(cookie);
            }
        }

        Cookies { cookies }
    }

    /// Add a cookie.
    ///
    /// If this is done to the response, the cookie will be sent it to the client,
    /// using the `Set-Cookie` header.
    pub fn add(&mut self, cookie: impl ToCookie) {
        let cookie = cookie.to_cookie();
        self.cookies.insert(cookie.name.clone(), cookie);
    }

    /// Get a cookie sent by the client.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Convert cookies to `Set-Cookie` headers which will be sent to the client.
    pub fn to_headers(&self) -> Vec<u8> {
        let mut headers = vec![];
        for cookie in self.cookies.values() {
            headers.extend_from_slice(format!("set-cookie: {}\r\n", cookie).as_bytes());
        }
        headers
    }
}

/// Convert a value to a cookie.
///
/// Most use cases would want to use the [`CookieBuilder`] instead.
pub trait ToCookie {
    fn to_cookie(self) -> Cookie;
}

impl ToCookie for (&str, &str) {
    fn to_cookie(self) -> Cookie {
        CookieBuilder::new().name(self.0).value(self.1).build()
    }
}

impl ToCookie for Cookie {
    fn to_cookie(self) -> Cookie {
        self
    }
}

/// A browser cookie.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cookie {
    name: String,
    value: String,
    expiration: Option<OffsetDateTime>,
    max_age: Option<Duration>,
    path: Option<String>,
    http_only: bool,
    secure: bool,
    same_site: Option<String>,
}

impl Cookie {
    /// Parse a single `name=value` pair from the `Cookie` header.
    fn parse(value: &str) -> Option<Self> {
        let (name, value) = match value.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (value.trim(), ""),
        };

        if name.is_empty() {
            return None;
        }

        // Quoted values are allowed by RFC 6265.
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        Some(CookieBuilder::new().name(name).value(urldecode(value)).build())
    }

    /// Get cookie value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the cookie is secure.
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Check if the cookie is HTTP-only.
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Get the cookie's `Max-Age` attribute if any is set.
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }
}

impl std::fmt::Display for Cookie {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;

        if let Some(ref max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age.whole_seconds())?;
        }

        if self.secure {
            write!(f, "; Secure")?;
        }

        if self.http_only {
            write!(f, "; HttpOnly")?;
        }

        write!(f, "; Path={}", self.path.as_deref().unwrap_or("/"))?;

        write!(f, "; SameSite={}", self.same_site.as_deref().unwrap_or("Lax"))?;

        if let Some(ref expiration) = self.expiration {
            let expires = expiration
                .format(format_description!(
                    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
                ))
                .map_err(|_| std::fmt::Error)?;
            write!(f, "; Expires={}", expires)?;
        }

        Ok(())
    }
}

/// Cookie builder which helps with creating cookies with multiple attributes.
///
/// # Example
///
/// ```
/// # use sigil::http::CookieBuilder;
/// use time::Duration;
///
/// let cookie = CookieBuilder::new()
///     .name("sigil_session")
///     .value("1234")
///     .max_age(Duration::days(4))
///     .secure()
///     .http_only()
///     .build();
/// ```
#[derive(Clone, Debug, Default)]
pub struct CookieBuilder {
    cookie: Cookie,
}

impl CookieBuilder {
    /// Create new cookie builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cookie name.
    pub fn name(mut self, name: impl ToString) -> Self {
        self.cookie.name = name.to_string();
        self
    }

    /// Set cookie value. The value is stored in plain text.
    pub fn value(mut self, value: impl ToString) -> Self {
        self.cookie.value = value.to_string();
        self
    }

    /// Set cookie `Expires` attribute. The time is converted to UTC.
    pub fn expiration(mut self, expiration: OffsetDateTime) -> Self {
        self.cookie.expiration = Some(expiration.to_offset(time::UtcOffset::UTC));
        self
    }

    /// Set cookie `Max-Age` attribute.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.cookie.max_age = Some(max_age);
        self
    }

    /// Set cookie `Path` attribute.
    pub fn path(mut self, path: impl ToString) -> Self {
        self.cookie.path = Some(path.to_string());
        self
    }

    /// Hide the cookie from JavaScript. This is the `HttpOnly` attribute.
    pub fn http_only(mut self) -> Self {
        self.cookie.http_only = true;
        self
    }

    /// Make sure the cookie is sent only via HTTPS connections.
    /// This is the `Secure` attribute.
    pub fn secure(mut self) -> Self {
        self.cookie.secure = true;
        self
    }

    /// Set cookie `SameSite` attribute to `Lax`.
    pub fn lax(mut self) -> Self {
        self.cookie.same_site = Some("Lax".to_string());
        self
    }

    /// Set cookie `SameSite` attribute to `Strict`.
    pub fn strict(mut self) -> Self {
        self.cookie.same_site = Some("Strict".to_string());
        self
    }

    /// Build the cookie.
    pub fn build(self) -> Cookie {
        self.cookie
    }
}

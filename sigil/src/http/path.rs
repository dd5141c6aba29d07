//! HTTP URL path, e.g. `/check_session?ts=1`.
use super::Error;

/// Request path, split into the part used for routing and the raw query string.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    base: String,
    query: String,
}

impl Default for Path {
    fn default() -> Self {
        Path {
            base: "/".to_string(),
            query: String::new(),
        }
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.base)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }

        Ok(())
    }
}

impl Path {
    /// Parse the path from the request line.
    ///
    /// # Example
    ///
    /// ```
    /// # use sigil::http::Path;
    /// let path = Path::parse("/me?fresh=1#top").unwrap();
    ///
    /// assert_eq!(path.base(), "/me");
    /// assert_eq!(path.query(), "fresh=1");
    /// ```
    pub fn parse(path: &str) -> Result<Path, Error> {
        if path.is_empty() {
            return Err(Error::MalformedRequest("empty path"));
        }

        // Fragments are never sent by browsers, but clients can be creative.
        let path = path.split('#').next().unwrap_or_default();

        let (base, query) = path.split_once('?').unwrap_or((path, ""));

        // All paths must be absolute.
        let base = if base.starts_with('/') {
            base.to_string()
        } else {
            format!("/{}", base)
        };

        Ok(Path {
            base,
            query: query.to_string(),
        })
    }

    /// Path without the query. This is what's used for routing.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Raw query string, without the `?`.
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let path = Path::parse("/login").unwrap();
        assert_eq!(path.base(), "/login");
        assert_eq!(path.query(), "");

        let path = Path::parse("check_session?a=1?b=2").unwrap();
        assert_eq!(path.base(), "/check_session");
        assert_eq!(path.query(), "a=1?b=2");
        assert_eq!(path.to_string(), "/check_session?a=1?b=2");

        assert!(Path::parse("").is_err());
    }
}

//! URL handling helpers.
//!
//! # Example
//!
//! ```
//! use sigil::http::urldecode;
//!
//! assert_eq!(urldecode("hello%20world%21"), "hello world!");
//! ```

/// Decode a string encoded with percent-encoding, also known as URL encoding.
///
/// Invalid escapes are kept as-is. Decoded bytes that aren't valid UTF-8
/// are replaced with the replacement character.
pub fn urldecode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            let high = (bytes[i + 1] as char).to_digit(16).unwrap_or(0) as u8;
            let low = (bytes[i + 2] as char).to_digit(16).unwrap_or(0) as u8;
            result.push(high << 4 | low);
            i += 3;
            continue;
        }

        result.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&result).to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_urldecode() {
        assert_eq!(urldecode("a%20b"), "a b");
        assert_eq!(urldecode("a+b"), "a+b");
        assert_eq!(urldecode("100%"), "100%");
        assert_eq!(urldecode("%zz"), "%zz");
        assert_eq!(urldecode("%41%42"), "AB");
        assert_eq!(urldecode("%C3%A9"), "é");
    }
}

//! Session token signing.
//!
//! A token is the session serialized as JSON, base64-encoded, followed by a dot
//! and the HMAC-SHA256 of the encoded payload:
//!
//! ```text
//! eyJ1c2VyX2lkIjoxfQ.3q2-7w...
//! ```
//!
//! The payload is readable by anyone holding the cookie; it's only protected
//! against modification.
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use tracing::debug;

use super::{Error, Session, SessionState};

type HmacSha256 = Hmac<Sha256>;

/// Shortest secret key accepted, in bytes.
pub const MIN_KEY_LEN: usize = 256 / 8;

const SEPARATOR: char = '.';

/// Generate a random secret key using the OS random number generator.
pub fn generate_key() -> Vec<u8> {
    let mut key = vec![0u8; MIN_KEY_LEN];
    OsRng.fill_bytes(&mut key);
    key
}

/// Generate a random secret key, encoded for the configuration file.
pub fn generate_key_base64() -> String {
    STANDARD.encode(generate_key())
}

/// Signs and verifies session tokens with a secret key.
///
/// # Example
///
/// ```
/// use sigil::session::{generate_key, Session, SessionState, Signer};
///
/// let signer = Signer::new(&generate_key()).unwrap();
/// let token = signer.encode(&Session::authenticated(1)).unwrap();
///
/// assert_eq!(signer.decode(&token), SessionState::Valid(Session::authenticated(1)));
/// ```
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

impl Signer {
    /// Create a signer using this secret key.
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        if key.len() < MIN_KEY_LEN {
            return Err(Error::KeyTooShort(key.len()));
        }

        let mac = HmacSha256::new_from_slice(key).map_err(|_| Error::KeyTooShort(key.len()))?;

        Ok(Self { mac })
    }

    /// Serialize and sign the session.
    pub fn encode(&self, session: &Session) -> Result<String, Error> {
        let json = serde_json::to_vec(session)?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}{}{}", payload, SEPARATOR, signature))
    }

    /// Verify and deserialize a token.
    ///
    /// An empty token is [`SessionState::Absent`], that's what a cleared cookie looks like.
    /// Anything that doesn't verify is [`SessionState::Invalid`].
    pub fn decode(&self, token: &str) -> SessionState {
        if token.is_empty() {
            return SessionState::Absent;
        }

        match self.verify(token) {
            Ok(session) => SessionState::Valid(session),
            Err(err) => {
                debug!("rejecting session token: {}", err);
                SessionState::Invalid
            }
        }
    }

    fn verify(&self, token: &str) -> Result<Session, Error> {
        let (payload, signature) = token
            .rsplit_once(SEPARATOR)
            .ok_or(Error::Malformed("missing separator"))?;
        let signature = URL_SAFE_NO_PAD.decode(signature)?;

        // Constant-time comparison.
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| Error::Signature)?;

        let json = URL_SAFE_NO_PAD.decode(payload)?;
        Ok(serde_json::from_slice(&json)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn signer() -> Signer {
        Signer::new(&[7u8; MIN_KEY_LEN]).expect("signer")
    }

    #[test]
    fn test_encode_decode() {
        let signer = signer();

        for user_id in [0, 1, 42, -5, i64::MAX, i64::MIN] {
            let token = signer.encode(&Session::authenticated(user_id)).unwrap();
            let decoded = signer.decode(&token);
            assert_eq!(decoded.user_id(), Some(user_id));
            assert_eq!(decoded, SessionState::Valid(Session::authenticated(user_id)));
        }
    }

    #[test]
    fn test_deterministic() {
        let signer = signer();

        let mut a = Session::authenticated(1);
        a.insert("theme", "dark");

        let mut b = Session::new();
        b.insert("theme", "dark");
        b.set_user_id(1);

        assert_eq!(signer.encode(&a).unwrap(), signer.encode(&b).unwrap());
    }

    #[test]
    fn test_bit_flip() {
        let signer = signer();
        let token = signer.encode(&Session::authenticated(1)).unwrap();

        for i in 0..token.len() {
            for bit in 0..8 {
                let mut bytes = token.as_bytes().to_vec();
                bytes[i] ^= 1 << bit;

                // Same decoding the request head applies to header values.
                let tampered = String::from_utf8_lossy(&bytes);

                assert_eq!(
                    signer.decode(&tampered),
                    SessionState::Invalid,
                    "byte {} bit {} accepted",
                    i,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_wrong_key() {
        let token = signer().encode(&Session::authenticated(1)).unwrap();
        let other = Signer::new(&generate_key()).unwrap();
        assert_eq!(other.decode(&token), SessionState::Invalid);
    }

    #[test]
    fn test_forged_payload() {
        let signer = signer();
        let token = signer.encode(&Session::authenticated(1)).unwrap();
        let (_, signature) = token.rsplit_once('.').unwrap();

        let forged = URL_SAFE_NO_PAD.encode(br#"{"user_id":2}"#);
        let forged = format!("{}.{}", forged, signature);
        assert_eq!(signer.decode(&forged), SessionState::Invalid);
    }

    #[test]
    fn test_garbage() {
        let signer = signer();
        assert_eq!(signer.decode(""), SessionState::Absent);

        for token in [".", "abc", "a.b", "..", "eyJ9.", ".eyJ9", "a.b.c", "💥.💥"] {
            assert_eq!(signer.decode(token), SessionState::Invalid, "{}", token);
        }
    }

    #[test]
    fn test_short_key() {
        let err = Signer::new(b"hunter2").expect_err("key too short");
        assert!(matches!(err, Error::KeyTooShort(7)));
    }

    #[test]
    fn test_generate_key() {
        let key = STANDARD.decode(generate_key_base64()).unwrap();
        assert_eq!(key.len(), MIN_KEY_LEN);
        assert_ne!(generate_key(), generate_key());
    }
}

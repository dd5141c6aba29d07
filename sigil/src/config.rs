//! Configuration loaded from a TOML file.
//!
//! The file is optional. Settings that aren't specified, or a missing file altogether,
//! fall back to defaults. If no secret key is configured, one is generated for the
//! lifetime of the process, so sessions won't survive a restart.
//!
//! ```toml
//! [general]
//! host = "0.0.0.0"
//! port = 8000
//! secret_key = "..."
//!
//! [session]
//! cookie_name = "sigil_session"
//! max_age = 3600
//!
//! [[users]]
//! id = 1
//! username = "ada"
//! ```
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::env::var;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::Duration;
use tracing::{info, warn};

use crate::session::{generate_key, MIN_KEY_LEN};

/// Environment variable pointing to the config file.
pub const CONFIG_ENV: &str = "SIGIL_CONFIG";

/// Config file used when nothing else is specified.
pub const DEFAULT_PATH: &str = "sigil.toml";

#[derive(Error, Debug)]
pub enum Error {
    #[error("config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config: {0}")]
    Io(#[from] std::io::Error),

    #[error("secret key is not valid base64")]
    Base64(#[from] base64::DecodeError),

    #[error("secret key must be at least {MIN_KEY_LEN} bytes, got {0}")]
    SecretKey(usize),
}

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    path: Option<PathBuf>,
    pub general: General,
    pub http: Http,
    pub session: SessionConfig,
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Clone)]
pub struct General {
    pub host: String,
    pub port: u16,
    /// Key used to sign session cookies.
    pub secret_key: Vec<u8>,
    /// The key was generated at startup and not read from the config.
    pub generated_key: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            host: GeneralConfig::default_host(),
            port: GeneralConfig::default_port(),
            secret_key: generate_key(),
            generated_key: true,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone)]
pub struct Http {
    pub header_max_size: usize,
    pub body_max_size: usize,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            header_max_size: 16 * 1024,  // 16KB
            body_max_size: 1024 * 1024, // 1MB
        }
    }
}

/// Session cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Send the cookie over HTTPS only.
    pub secure: bool,
    /// Cookie lifetime in seconds. If not set, the cookie expires
    /// when the browser is closed.
    pub max_age: Option<i64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "sigil_session".into(),
            secure: false,
            max_age: None,
        }
    }
}

impl SessionConfig {
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age.map(Duration::seconds)
    }
}

/// A user the credential store starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    pub id: i64,
    pub username: String,
}

impl Config {
    /// Load config from the file in `SIGIL_CONFIG`, or `sigil.toml`.
    pub fn load() -> Result<Config, Error> {
        let path = match var(CONFIG_ENV) {
            Ok(path) => PathBuf::from(path),
            Err(_) => PathBuf::from(DEFAULT_PATH),
        };

        Self::load_from(path)
    }

    /// Load config from a file. If the file doesn't exist, defaults are used.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Config, Error> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Config::default());
        }

        let mut config = Self::parse(&read_to_string(path)?)?;
        config.path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse config from TOML.
    pub fn parse(s: &str) -> Result<Config, Error> {
        let file: ConfigFile = toml::from_str(s)?;

        let (secret_key, generated_key) = match file.general.secret_key {
            Some(ref key) => (decode_secret_key(key)?, false),
            None => (generate_key(), true),
        };

        Ok(Config {
            path: None,
            general: General {
                host: file.general.host,
                port: file.general.port,
                secret_key,
                generated_key,
            },
            http: Http {
                header_max_size: file.general.header_max_size,
                body_max_size: file.general.body_max_size,
            },
            session: file.session,
            users: file.users,
        })
    }

    /// Where the config was loaded from, if not defaults.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Log where the config came from.
    pub fn log_info(&self) {
        match self.path {
            Some(ref path) => info!("Configuration file \"{}\" loaded", path.display()),
            None => info!("Configuration file not found, using defaults"),
        }

        if self.general.generated_key {
            warn!("No secret key configured, sessions will not survive a restart");
        }
    }
}

fn decode_secret_key(key: &str) -> Result<Vec<u8>, Error> {
    let bytes = general_purpose::STANDARD.decode(key.trim())?;

    if bytes.len() < MIN_KEY_LEN {
        Err(Error::SecretKey(bytes.len()))
    } else {
        Ok(bytes)
    }
}

#[derive(Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    general: GeneralConfig,
    #[serde(default)]
    session: SessionConfig,
    #[serde(default)]
    users: Vec<UserConfig>,
}

#[derive(Serialize, Deserialize)]
struct GeneralConfig {
    #[serde(default = "GeneralConfig::default_host")]
    host: String,
    #[serde(default = "GeneralConfig::default_port")]
    port: u16,
    secret_key: Option<String>,
    #[serde(default = "GeneralConfig::default_header_max_size")]
    header_max_size: usize,
    #[serde(default = "GeneralConfig::default_body_max_size")]
    body_max_size: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            secret_key: None,
            header_max_size: Self::default_header_max_size(),
            body_max_size: Self::default_body_max_size(),
        }
    }
}

impl GeneralConfig {
    fn default_host() -> String {
        "0.0.0.0".into()
    }

    fn default_port() -> u16 {
        8000
    }

    fn default_header_max_size() -> usize {
        Http::default().header_max_size
    }

    fn default_body_max_size() -> usize {
        Http::default().body_max_size
    }
}

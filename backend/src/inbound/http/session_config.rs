//! Session cookie settings read from the environment.
//!
//! Release builds need `SESSION_COOKIE_SECURE`, `SESSION_SAMESITE` and a
//! readable key file of at least 64 bytes. Debug builds fill gaps with
//! secure Lax cookies and a per-process key, logging each fallback.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const DEFAULT_KEY_PATH: &str = "/run/secrets/roombook_session_key";
const MIN_KEY_LEN: usize = 64;

/// Whether configuration gaps are tolerated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Debug when compiled with `debug_assertions`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated cookie settings handed to the session middleware.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Session configuration problems.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },
    #[error("{name}='{value}' is not one of {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("SESSION_SAMESITE=None needs SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("cannot read session key {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key {path} has {length} bytes; at least 64 are needed")]
    KeyTooShort { path: PathBuf, length: usize },
}

/// Read and validate session settings.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use roombook::inbound::http::session_config::{BuildMode, session_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
/// let settings = session_settings_from_env(&env, BuildMode::Debug)?;
/// assert!(settings.cookie_secure);
/// # Ok::<(), roombook::inbound::http::session_config::SessionConfigError>(())
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = tolerate(mode, true, cookie_secure(env.string(COOKIE_SECURE_ENV)))?;
    let same_site = tolerate(
        mode,
        SameSite::Lax,
        same_site(env.string(SAMESITE_ENV), cookie_secure),
    )?;
    let path = env
        .string(KEY_FILE_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_KEY_PATH), PathBuf::from);
    let key = match read_key(path) {
        Ok(key) => key,
        Err(error) if mode == BuildMode::Debug => {
            warn!(%error, "using a per-process session key");
            Key::generate()
        }
        Err(error) => return Err(error),
    };
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Debug builds log the problem and carry on with `fallback`.
fn tolerate<T>(
    mode: BuildMode,
    fallback: T,
    parsed: Result<T, SessionConfigError>,
) -> Result<T, SessionConfigError> {
    match (parsed, mode) {
        (Ok(value), _) => Ok(value),
        (Err(error), BuildMode::Debug) => {
            warn!(%error, "session setting defaulted");
            Ok(fallback)
        }
        (Err(error), BuildMode::Release) => Err(error),
    }
}

fn cookie_secure(raw: Option<String>) -> Result<bool, SessionConfigError> {
    let value = raw.ok_or(SessionConfigError::Missing {
        name: COOKIE_SECURE_ENV,
    })?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(SessionConfigError::Invalid {
            name: COOKIE_SECURE_ENV,
            value,
            expected: "1|0|true|false|yes|no",
        }),
    }
}

fn same_site(raw: Option<String>, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
    let value = raw.ok_or(SessionConfigError::Missing { name: SAMESITE_ENV })?;
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ => Err(SessionConfigError::Invalid {
            name: SAMESITE_ENV,
            value,
            expected: "Strict|Lax|None",
        }),
    }
}

fn read_key(path: PathBuf) -> Result<Key, SessionConfigError> {
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => Zeroizing::new(bytes),
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };
    if bytes.len() < MIN_KEY_LEN {
        return Err(SessionConfigError::KeyTooShort {
            path,
            length: bytes.len(),
        });
    }
    Ok(Key::derive_from(&bytes))
}

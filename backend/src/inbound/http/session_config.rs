//! Cookie session configuration read from the environment.
//!
//! Debug builds fall back to development defaults with a warning; release
//! builds refuse to start unless every toggle is set explicitly and a signing
//! key of at least [`SESSION_KEY_MIN_LEN`] bytes is readable.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
pub const SESSION_KEY_MIN_LEN: usize = 64;
pub const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
pub const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
pub const SAMESITE_ENV: &str = "SESSION_SAMESITE";
pub const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// How strictly the session toggles are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated cookie session settings.
#[derive(Clone)]
pub struct SessionCookieSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate the session toggles.
///
/// # Examples
///
/// ```rust
/// use audit_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// // Debug builds tolerate a bare environment.
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionCookieSettings, SessionConfigError> {
    let cookie_secure = toggle(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = toggle(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = signing_key(env, mode, allow_ephemeral)?;
    Ok(SessionCookieSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Fetch `name`, or `None` when a debug build may fall back to a default.
fn lookup<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
) -> Result<Option<String>, SessionConfigError> {
    match (env.string(name), mode) {
        (Some(value), _) => Ok(Some(value)),
        (None, BuildMode::Debug) => {
            warn!(variable = name, "session toggle not set; using default");
            Ok(None)
        }
        (None, BuildMode::Release) => Err(SessionConfigError::MissingEnv { name }),
    }
}

fn toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = lookup(env, mode, name)? else {
        return Ok(default);
    };
    match (parse_bool(&value), mode) {
        (Some(flag), _) => Ok(flag),
        (None, BuildMode::Debug) => {
            warn!(variable = name, %value, "invalid session toggle; using default");
            Ok(default)
        }
        (None, BuildMode::Release) => Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    let Some(value) = lookup(env, mode, SAMESITE_ENV)? else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => match mode {
            BuildMode::Debug => {
                warn!("SESSION_SAMESITE=None without a secure cookie; browsers may reject it");
                Ok(SameSite::None)
            }
            BuildMode::Release => Err(SessionConfigError::InsecureSameSiteNone),
        },
        _ => match mode {
            BuildMode::Debug => {
                warn!(%value, "invalid SESSION_SAMESITE; using default");
                Ok(default)
            }
            BuildMode::Release => Err(SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            }),
        },
    }
}

fn signing_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let too_short = mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN;
            let key = (!too_short).then(|| Key::derive_from(&bytes));
            bytes.zeroize();
            key.ok_or(SessionConfigError::KeyTooShort {
                path,
                length,
                min_len: SESSION_KEY_MIN_LEN,
            })
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;
    use uuid::Uuid;

    struct KeyFile(PathBuf);

    impl KeyFile {
        fn with_len(len: usize) -> Self {
            let path = std::env::temp_dir().join(format!("audit-session-key-{}", Uuid::new_v4()));
            std::fs::write(&path, vec![b'k'; len]).expect("write key file");
            Self(path)
        }

        fn path(&self) -> String {
            self.0.to_string_lossy().into_owned()
        }
    }

    impl Drop for KeyFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn env_with(vars: &[(&str, String)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn release_env(key: &KeyFile, overrides: &[(&str, &str)]) -> MockEnv {
        let mut vars = vec![
            (KEY_FILE_ENV, key.path()),
            (COOKIE_SECURE_ENV, "1".to_owned()),
            (SAMESITE_ENV, "Strict".to_owned()),
            (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
        ];
        for &(name, value) in overrides {
            vars.retain(|(existing, _)| *existing != name);
            vars.push((name, value.to_owned()));
        }
        env_with(&vars)
    }

    #[rstest]
    fn release_accepts_explicit_settings() {
        let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
        let settings = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release)
            .expect("valid release settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    fn debug_tolerates_empty_environment() {
        let settings = session_settings_from_env(&env_with(&[]), BuildMode::Debug)
            .expect("debug defaults");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    fn release_requires_cookie_secure() {
        let err = session_settings_from_env(&env_with(&[]), BuildMode::Release)
            .err()
            .expect("missing toggle rejected");
        assert!(matches!(
            err,
            SessionConfigError::MissingEnv {
                name: COOKIE_SECURE_ENV
            }
        ));
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV, "maybe")]
    #[case(SAMESITE_ENV, "sideways")]
    #[case(ALLOW_EPHEMERAL_ENV, "")]
    fn release_rejects_invalid_values(#[case] name: &str, #[case] value: &str) {
        let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
        let err = session_settings_from_env(&release_env(&key, &[(name, value)]), BuildMode::Release)
            .err()
            .expect("invalid toggle rejected");
        assert!(matches!(err, SessionConfigError::InvalidEnv { .. }));
    }

    #[rstest]
    fn release_rejects_insecure_same_site_none() {
        let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
        let env = release_env(&key, &[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("insecure none rejected");
        assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
    }

    #[rstest]
    fn release_rejects_ephemeral_keys() {
        let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
        let env = release_env(&key, &[(ALLOW_EPHEMERAL_ENV, "yes")]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("ephemeral rejected");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    fn release_rejects_short_key() {
        let key = KeyFile::with_len(SESSION_KEY_MIN_LEN - 1);
        let err = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release)
            .err()
            .expect("short key rejected");
        assert!(matches!(
            err,
            SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
        ));
    }

    #[rstest]
    fn release_reports_unreadable_key() {
        let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
        let missing = key.0.with_extension("missing");
        let env = release_env(&key, &[(KEY_FILE_ENV, missing.to_str().expect("utf-8 path"))]);
        let err = session_settings_from_env(&env, BuildMode::Release)
            .err()
            .expect("unreadable key rejected");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    #[case("TRUE", Some(true))]
    #[case(" n ", Some(false))]
    #[case("2", None)]
    fn parses_boolean_toggles(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }
}

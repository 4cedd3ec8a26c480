//! Environment readers backing [`session_settings_from_env`].
//!
//! [`session_settings_from_env`]: super::session_settings_from_env

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

use super::{
    BuildMode, KEY_FILE_ENV, SAMESITE_ENV, SESSION_KEY_DEFAULT_PATH, SESSION_KEY_MIN_LEN,
    SessionConfigError,
};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

pub(super) struct EnvReader<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<'a, E: Env> EnvReader<'a, E> {
    pub(super) fn new(env: &'a E, mode: BuildMode) -> Self {
        Self { env, mode }
    }

    /// Debug builds substitute `fallback` after warning; release builds fail.
    fn lenient<T>(
        &self,
        fallback: T,
        error: SessionConfigError,
        warn_fn: impl FnOnce(),
    ) -> Result<T, SessionConfigError> {
        if self.mode.is_debug() {
            warn_fn();
            Ok(fallback)
        } else {
            Err(error)
        }
    }

    pub(super) fn flag(&self, name: &'static str, fallback: bool) -> Result<bool, SessionConfigError> {
        let Some(value) = self.env.string(name) else {
            return self.lenient(fallback, SessionConfigError::MissingEnv { name }, || {
                warn!(fallback, "{name} not set; using default");
            });
        };
        if let Some(flag) = parse_bool(&value) {
            return Ok(flag);
        }
        let error = SessionConfigError::InvalidEnv {
            name,
            value: value.clone(),
            expected: BOOL_EXPECTED,
        };
        self.lenient(fallback, error, || {
            warn!(value = %value, fallback, "invalid {name}; using default");
        })
    }

    pub(super) fn same_site(&self, cookie_secure: bool) -> Result<SameSite, SessionConfigError> {
        let fallback = if self.mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        };
        let Some(value) = self.env.string(SAMESITE_ENV) else {
            return self.lenient(
                fallback,
                SessionConfigError::MissingEnv { name: SAMESITE_ENV },
                || warn!("SESSION_SAMESITE not set; using default"),
            );
        };
        match value.to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" if cookie_secure => Ok(SameSite::None),
            "none" => self.lenient(
                SameSite::None,
                SessionConfigError::InsecureSameSiteNone,
                || {
                    warn!(
                        "SESSION_SAMESITE=None with SESSION_COOKIE_SECURE=0; browsers may reject the cookie"
                    );
                },
            ),
            _ => {
                let error = SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value: value.clone(),
                    expected: SAMESITE_EXPECTED,
                };
                self.lenient(fallback, error, || {
                    warn!(value = %value, "invalid SESSION_SAMESITE; using default");
                })
            }
        }
    }

    /// Derive the signing key from the key file, zeroising the raw bytes.
    pub(super) fn signing_key(&self, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path = PathBuf::from(
            self.env
                .string(KEY_FILE_ENV)
                .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
        );

        let mut bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) if self.mode.is_debug() || allow_ephemeral => {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "using temporary session key (dev only)"
                );
                return Ok(Key::generate());
            }
            Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
        };

        let length = bytes.len();
        if length < SESSION_KEY_MIN_LEN {
            bytes.zeroize();
            let error = SessionConfigError::KeyTooShort {
                path: path.clone(),
                length,
                min_len: SESSION_KEY_MIN_LEN,
            };
            return self.lenient(Key::generate(), error, || {
                warn!(
                    path = %path.display(),
                    length,
                    "session key too short; using temporary session key (dev only)"
                );
            });
        }
        let key = Key::derive_from(&bytes);
        bytes.zeroize();
        Ok(key)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

//! Port for server-side session persistence keyed by an opaque session key.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rand::distributions::{Alphanumeric, DistString};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

use super::define_port_error;

/// Number of characters in a generated session key.
pub const SESSION_KEY_LEN: usize = 48;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "session store connection failed: {message}",
        /// Store command failed during execution.
        Query { message: String } => "session store query failed: {message}",
        /// A stored record could not be encoded or decoded.
        Codec { message: String } => "session record codec failed: {message}",
    }
}

/// Opaque session identifier carried by the client cookie.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(Alphanumeric.sample_string(&mut rand::thread_rng(), SESSION_KEY_LEN))
    }

    /// Accept a key presented by a client.
    ///
    /// Returns `None` unless the value has the shape of a generated key.
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed =
            raw.len() == SESSION_KEY_LEN && raw.bytes().all(|b| b.is_ascii_alphanumeric());
        well_formed.then(|| Self(raw.to_owned()))
    }

    /// Borrow the key as text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Persisted session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Authenticated user bound to the session.
    pub user_id: UserId,
}

impl SessionRecord {
    /// Record bound to `user_id`.
    pub fn for_user(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Key/value storage for session records with a time-to-live.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the record for `key`; `Ok(None)` when absent or expired.
    async fn load(&self, key: &SessionKey) -> Result<Option<SessionRecord>, SessionStoreError>;

    /// Write `record` under `key`, replacing any previous value.
    async fn save(
        &self,
        key: &SessionKey,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;

    /// Remove the record for `key`. Removing an absent key succeeds.
    async fn destroy(&self, key: &SessionKey) -> Result<(), SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generated_keys_parse_back() {
        let key = SessionKey::generate();
        assert_eq!(key.as_str().len(), SESSION_KEY_LEN);
        assert_eq!(SessionKey::parse(key.as_str()), Some(key));
    }

    #[rstest]
    #[case("")]
    #[case("short")]
    #[case("!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!")]
    fn rejects_malformed_keys(#[case] raw: &str) {
        assert!(SessionKey::parse(raw).is_none());
    }

    #[rstest]
    fn record_uses_camel_case_user_id() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let json = serde_json::to_value(SessionRecord::for_user(id)).expect("encode record");
        assert_eq!(
            json,
            serde_json::json!({ "userId": "3fa85f64-5717-4562-b3fc-2c963f66afa6" })
        );
    }
}

//! Session store adapters.
//!
//! - [`InMemorySessionStore`]: process-local map, used when Redis is not
//!   configured and in tests.
//! - [`RedisSessionStore`]: `bb8-redis` pool with per-key `SET EX`, `GET`
//!   and `DEL` under the `sess:` prefix.

mod memory_store;
mod redis_store;

pub use memory_store::InMemorySessionStore;
pub use redis_store::{REDIS_KEY_PREFIX, RedisSessionStore};

use crate::domain::ports::{SessionRecord, SessionStoreError};

fn encode_record(record: &SessionRecord) -> Result<String, SessionStoreError> {
    serde_json::to_string(record).map_err(|err| SessionStoreError::codec(err.to_string()))
}

fn decode_record(raw: &str) -> Result<SessionRecord, SessionStoreError> {
    serde_json::from_str(raw).map_err(|err| SessionStoreError::codec(err.to_string()))
}

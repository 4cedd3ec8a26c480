//! Redis-backed `SessionStore` over a `bb8-redis` pool.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::{self, RedisError};
use tracing::debug;

use crate::domain::ports::{SessionKey, SessionRecord, SessionStore, SessionStoreError};

use super::{decode_record, encode_record};

/// Prefix applied to every session key in Redis.
pub const REDIS_KEY_PREFIX: &str = "sess:";

/// Session store speaking `SET EX`/`GET`/`DEL` to Redis.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisSessionStore {
    /// Build a pool for `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Connection` when the URL is invalid or the
    /// initial connections cannot be opened.
    pub async fn connect(redis_url: &str) -> Result<Self, SessionStoreError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, SessionStoreError> {
        self.pool.get().await.map_err(|err| match err {
            RunError::User(err) => map_redis_error(&err),
            RunError::TimedOut => SessionStoreError::connection("timed out waiting for connection"),
        })
    }
}

fn redis_key(key: &SessionKey) -> String {
    format!("{REDIS_KEY_PREFIX}{}", key.as_str())
}

fn map_redis_error(error: &RedisError) -> SessionStoreError {
    debug!(kind = ?error.kind(), %error, "redis operation failed");
    if error.is_connection_dropped() || error.is_connection_refusal() || error.is_timeout() {
        SessionStoreError::connection(error.to_string())
    } else {
        SessionStoreError::query(error.to_string())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, key: &SessionKey) -> Result<Option<SessionRecord>, SessionStoreError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(redis_key(key))
            .query_async(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))?;
        raw.as_deref().map(decode_record).transpose()
    }

    async fn save(
        &self,
        key: &SessionKey,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let payload = encode_record(record)?;
        let seconds = ttl.as_secs().max(1);
        let mut conn = self.connection().await?;
        redis::cmd("SET")
            .arg(redis_key(key))
            .arg(payload)
            .arg("EX")
            .arg(seconds)
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))
    }

    async fn destroy(&self, key: &SessionKey) -> Result<(), SessionStoreError> {
        let mut conn = self.connection().await?;
        redis::cmd("DEL")
            .arg(redis_key(key))
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|err| map_redis_error(&err))
    }
}

//! Process-local `SessionStore` with TTL expiry on read.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::ports::{SessionKey, SessionRecord, SessionStore, SessionStoreError};

struct Entry {
    record: SessionRecord,
    expires_at: Instant,
}

/// Mutex-guarded session map.
///
/// Expired entries are dropped when read and swept on every write.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<SessionKey, Entry>>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionKey, Entry>>, SessionStoreError> {
        self.entries
            .lock()
            .map_err(|_| SessionStoreError::query("session map lock poisoned"))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, key: &SessionKey) -> Result<Option<SessionRecord>, SessionStoreError> {
        let mut entries = self.lock()?;
        let Some(entry) = entries.get(key) else {
            return Ok(None);
        };
        if entry.expires_at > Instant::now() {
            return Ok(Some(entry.record.clone()));
        }
        entries.remove(key);
        Ok(None)
    }

    async fn save(
        &self,
        key: &SessionKey,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| SessionStoreError::query("session ttl overflows the clock"))?;
        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.clone(),
            Entry {
                record: record.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn destroy(&self, key: &SessionKey) -> Result<(), SessionStoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

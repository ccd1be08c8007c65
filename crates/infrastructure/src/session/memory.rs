//! In-memory session store with TTL expiry.
//!
//! Entries expire at `set time + ttl` as read from the injected clock. Expired
//! entries are invisible to reads and are dropped lazily on write, or eagerly
//! through [`InMemorySessionStore::purge_expired`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mpauth_application::ports::{Clock, SessionStore, SessionStoreError};
use mpauth_domain::SessionRecord;
use tokio::sync::RwLock;

use crate::adapters::SystemClock;

#[derive(Debug, Clone, Copy)]
struct Entry {
    record: SessionRecord,
    expires_at: DateTime<Utc>,
}

/// Thread-safe in-memory session store.
///
/// Keys are enumerated in lexicographic order, so prefix lookups return
/// matches deterministically. Clones share the same state.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<BTreeMap<String, Entry>>>,
    claims: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    /// Creates an empty store driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Creates an empty store driven by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(BTreeMap::new())),
            claims: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Drops every expired session and reservation, returning how many
    /// sessions were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        let removed = before - sessions.len();
        drop(sessions);

        self.claims.write().await.retain(|_, expires_at| *expires_at > now);
        removed
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        let sessions = self.sessions.read().await;
        sessions.values().filter(|entry| entry.expires_at > now).count()
    }

    /// Returns true if no session is live.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Saturating `now + ttl_secs`.
fn expiry(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<SessionRecord>, SessionStoreError> {
        let now = self.clock.now();
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.record))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        record: SessionRecord,
        ttl_secs: u64,
    ) -> Result<(), SessionStoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| entry.expires_at > now);
        sessions.insert(
            key.to_string(),
            Entry {
                record,
                expires_at: expiry(now, ttl_secs),
            },
        );
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        for key in keys {
            sessions.remove(key);
        }
        Ok(())
    }

    async fn keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>, SessionStoreError> {
        let now = self.clock.now();
        let sessions = self.sessions.read().await;
        Ok(sessions
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entry)| entry.expires_at > now)
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn claim(&self, key: &str, ttl_secs: u64) -> Result<bool, SessionStoreError> {
        let now = self.clock.now();
        let mut claims = self.claims.write().await;
        if claims.get(key).is_some_and(|expires_at| *expires_at > now) {
            return Ok(false);
        }
        claims.insert(key.to_string(), expiry(now, ttl_secs));
        Ok(true)
    }

    async fn release(&self, key: &str) -> Result<(), SessionStoreError> {
        self.claims.write().await.remove(key);
        Ok(())
    }
}

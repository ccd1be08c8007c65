//! Session store port
//!
//! Ephemeral key-value store with native per-key TTL, keyed by token string.

use async_trait::async_trait;
use mpauth_domain::SessionRecord;

/// Errors raised by a session store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    /// The store could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The store rejected or failed the command.
    #[error("command failed: {0}")]
    Command(String),
}

/// Port for the session store.
///
/// Expiry is enforced by the store itself; callers never compare timestamps.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the live record under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<SessionRecord>, SessionStoreError>;

    /// Stores `record` under `key`, expiring after `ttl_secs`.
    async fn set_with_ttl(
        &self,
        key: &str,
        record: SessionRecord,
        ttl_secs: u64,
    ) -> Result<(), SessionStoreError>;

    /// Deletes every key in `keys`. Missing keys are ignored.
    async fn delete_many(&self, keys: &[String]) -> Result<(), SessionStoreError>;

    /// Lists live keys starting with `prefix`.
    async fn keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>, SessionStoreError>;

    /// Atomically takes the reservation `key` for `ttl_secs` if nobody holds it.
    ///
    /// Reservations live in a namespace disjoint from session keys: they are
    /// never returned by [`SessionStore::get`] or [`SessionStore::keys_by_prefix`].
    /// Returns `true` when the reservation was taken.
    async fn claim(&self, key: &str, ttl_secs: u64) -> Result<bool, SessionStoreError>;

    /// Drops the reservation `key`.
    async fn release(&self, key: &str) -> Result<(), SessionStoreError>;
}

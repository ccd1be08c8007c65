//! Hand-written port doubles shared by the use case tests.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::significant_drop_tightening)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mpauth_domain::{AuthSettings, IdentityClaims, SessionRecord, SubjectId, UserRow};

use crate::ports::{
    Clock, CredentialDecryptor, DecryptError, IdentityError, IdentityVerifier, RegistryError,
    SessionSecret, SessionStore, SessionStoreError, UserRegistry, VerifiedIdentity,
};

pub fn settings() -> AuthSettings {
    AuthSettings::builder()
        .app_id("wx-test")
        .app_secret("secret")
        .sku("app-v1")
        .token_ttl_secs(259_200)
        .build()
        .expect("valid settings")
}

pub fn settings_with_claims() -> AuthSettings {
    AuthSettings::builder()
        .app_id("wx-test")
        .app_secret("secret")
        .sku("app-v1")
        .claim_ttl_secs(10)
        .build()
        .expect("valid settings")
}

#[derive(Clone)]
pub struct FixedClock(Arc<Mutex<DateTime<Utc>>>);

impl FixedClock {
    pub fn at_millis(millis: i64) -> Self {
        let at = Utc.timestamp_millis_opt(millis).single().expect("valid timestamp");
        Self(Arc::new(Mutex::new(at)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("Lock poisoned")
    }
}

#[derive(Default)]
struct StoreState {
    entries: BTreeMap<String, (SessionRecord, u64)>,
    claims: BTreeSet<String>,
    reads: usize,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// Session store keeping entries forever; expiry is simulated with `expire`.
#[derive(Clone, Default)]
pub struct MockSessionStore(Arc<Mutex<StoreState>>);

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, key: &str) {
        let mut state = self.0.lock().expect("Lock poisoned");
        state.entries.insert(
            key.to_string(),
            (SessionRecord::new(DateTime::<Utc>::UNIX_EPOCH), 60),
        );
    }

    pub fn expire(&self, key: &str) {
        self.0.lock().expect("Lock poisoned").entries.remove(key);
    }

    pub fn entry(&self, key: &str) -> Option<(SessionRecord, u64)> {
        self.0.lock().expect("Lock poisoned").entries.get(key).copied()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.lock().expect("Lock poisoned").entries.keys().cloned().collect()
    }

    /// Calls to `get` and `keys_by_prefix`, failed ones included.
    pub fn reads(&self) -> usize {
        self.0.lock().expect("Lock poisoned").reads
    }

    pub fn writes(&self) -> usize {
        self.0.lock().expect("Lock poisoned").writes
    }

    pub fn hold_claim(&self, key: &str) {
        self.0.lock().expect("Lock poisoned").claims.insert(key.to_string());
    }

    pub fn claims(&self) -> Vec<String> {
        self.0.lock().expect("Lock poisoned").claims.iter().cloned().collect()
    }

    pub fn fail_reads(&self) {
        self.0.lock().expect("Lock poisoned").fail_reads = true;
    }

    pub fn fail_writes(&self) {
        self.0.lock().expect("Lock poisoned").fail_writes = true;
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn get(&self, key: &str) -> Result<Option<SessionRecord>, SessionStoreError> {
        let mut state = self.0.lock().expect("Lock poisoned");
        state.reads += 1;
        if state.fail_reads {
            return Err(SessionStoreError::Connection("store offline".to_string()));
        }
        Ok(state.entries.get(key).map(|(record, _)| *record))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        record: SessionRecord,
        ttl_secs: u64,
    ) -> Result<(), SessionStoreError> {
        let mut state = self.0.lock().expect("Lock poisoned");
        if state.fail_writes {
            return Err(SessionStoreError::Command("read-only replica".to_string()));
        }
        state.writes += 1;
        state.entries.insert(key.to_string(), (record, ttl_secs));
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<(), SessionStoreError> {
        let mut state = self.0.lock().expect("Lock poisoned");
        if state.fail_writes {
            return Err(SessionStoreError::Command("read-only replica".to_string()));
        }
        state.writes += 1;
        for key in keys {
            state.entries.remove(key);
        }
        Ok(())
    }

    async fn keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>, SessionStoreError> {
        let mut state = self.0.lock().expect("Lock poisoned");
        state.reads += 1;
        if state.fail_reads {
            return Err(SessionStoreError::Connection("store offline".to_string()));
        }
        Ok(state
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn claim(&self, key: &str, _ttl_secs: u64) -> Result<bool, SessionStoreError> {
        Ok(self.0.lock().expect("Lock poisoned").claims.insert(key.to_string()))
    }

    async fn release(&self, key: &str) -> Result<(), SessionStoreError> {
        self.0.lock().expect("Lock poisoned").claims.remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct RegistryState {
    rows: Vec<UserRow>,
    inserts: usize,
    fail: bool,
}

#[derive(Clone, Default)]
pub struct MockRegistry(Arc<Mutex<RegistryState>>);

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, subject: &str) {
        let row = UserRow::new(
            SubjectId::new(subject).expect("valid subject"),
            DateTime::<Utc>::UNIX_EPOCH,
        );
        self.0.lock().expect("Lock poisoned").rows.push(row);
    }

    pub fn inserts(&self) -> usize {
        self.0.lock().expect("Lock poisoned").inserts
    }

    pub fn count(&self, subject: &str) -> usize {
        self.0
            .lock()
            .expect("Lock poisoned")
            .rows
            .iter()
            .filter(|row| row.subject_id.as_str() == subject)
            .count()
    }

    pub fn fail(&self) {
        self.0.lock().expect("Lock poisoned").fail = true;
    }
}

#[async_trait]
impl UserRegistry for MockRegistry {
    async fn find_by_subject_id(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<UserRow>, RegistryError> {
        let state = self.0.lock().expect("Lock poisoned");
        if state.fail {
            return Err(RegistryError::Backend("database is locked".to_string()));
        }
        Ok(state
            .rows
            .iter()
            .filter(|row| &row.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, row: &UserRow) -> Result<(), RegistryError> {
        let mut state = self.0.lock().expect("Lock poisoned");
        if state.fail {
            return Err(RegistryError::Backend("database is locked".to_string()));
        }
        state.inserts += 1;
        state.rows.push(row.clone());
        Ok(())
    }
}

/// Identity exchange answering every code with the same identity.
#[derive(Clone)]
pub struct StubVerifier {
    outcome: Result<IdentityClaims, IdentityError>,
    calls: Arc<Mutex<usize>>,
}

impl StubVerifier {
    pub fn returning(claims: IdentityClaims) -> Self {
        Self {
            outcome: Ok(claims),
            calls: Arc::default(),
        }
    }

    pub fn failing(error: IdentityError) -> Self {
        Self {
            outcome: Err(error),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("Lock poisoned")
    }
}

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn exchange(&self, _code: &str) -> Result<VerifiedIdentity, IdentityError> {
        *self.calls.lock().expect("Lock poisoned") += 1;
        self.outcome.clone().map(|claims| VerifiedIdentity {
            session_secret: SessionSecret::new("session-key"),
            claims,
        })
    }
}

/// Decryptor ignoring its inputs and returning a fixed identity.
#[derive(Clone)]
pub struct StubDecryptor {
    outcome: Result<IdentityClaims, DecryptError>,
    calls: Arc<Mutex<usize>>,
}

impl StubDecryptor {
    pub fn returning(claims: IdentityClaims) -> Self {
        Self {
            outcome: Ok(claims),
            calls: Arc::default(),
        }
    }

    pub fn failing(error: DecryptError) -> Self {
        Self {
            outcome: Err(error),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("Lock poisoned")
    }
}

#[async_trait]
impl CredentialDecryptor for StubDecryptor {
    async fn decrypt(
        &self,
        _secret: &SessionSecret,
        _payload: &str,
        _iv: &str,
    ) -> Result<IdentityClaims, DecryptError> {
        *self.calls.lock().expect("Lock poisoned") += 1;
        self.outcome.clone()
    }
}

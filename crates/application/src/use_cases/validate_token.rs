//! Validate token use case.

use std::sync::Arc;

use tracing::debug;

use crate::ports::SessionStore;

/// Checks whether a token still has a live session record.
///
/// Expiry is left to the store's TTL; a lookup failure counts as invalid.
#[derive(Clone)]
pub struct ValidateToken {
    store: Arc<dyn SessionStore>,
}

impl ValidateToken {
    /// Creates a new `ValidateToken` use case.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Returns true if `token` maps to a live session.
    pub async fn execute(&self, token: Option<&str>) -> bool {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return false;
        };
        match self.store.get(token).await {
            Ok(record) => record.is_some(),
            Err(e) => {
                debug!(error = %e, "token lookup failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSessionStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_live_token_is_valid() {
        let store = MockSessionStore::new();
        store.seed("u123|app-v1|abc");
        let use_case = ValidateToken::new(Arc::new(store.clone()));

        assert!(use_case.execute(Some("u123|app-v1|abc")).await);

        store.expire("u123|app-v1|abc");
        assert!(!use_case.execute(Some("u123|app-v1|abc")).await);
    }

    #[tokio::test]
    async fn test_absent_token_is_invalid_without_lookup() {
        let store = MockSessionStore::new();
        store.seed("");
        let use_case = ValidateToken::new(Arc::new(store.clone()));

        assert!(!use_case.execute(None).await);
        assert!(!use_case.execute(Some("")).await);
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test]
    async fn test_lookup_error_is_invalid() {
        let store = MockSessionStore::new();
        store.seed("u123|app-v1|abc");
        store.fail_reads();
        let use_case = ValidateToken::new(Arc::new(store.clone()));

        assert!(!use_case.execute(Some("u123|app-v1|abc")).await);
        assert_eq!(store.reads(), 1);
    }
}

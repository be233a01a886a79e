//! Process-local session revocation.
//!
//! Logging out records the session id with an expiry at least as late as the last token
//! that session could have issued. Any token carrying a revoked `sid` is refused until
//! that time. Entries live in this process only.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Revokes `session_id` until the Unix time `until`.
    async fn revoke(&self, session_id: Uuid, until: i64);

    async fn is_revoked(&self, session_id: Uuid) -> bool;
}

#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    entries: RwLock<HashMap<Uuid, i64>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, including ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, session_id: Uuid, until: i64) {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, expiry| *expiry > now);
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired revocation entries");
        }

        let expiry = entries.entry(session_id).or_insert(until);
        *expiry = (*expiry).max(until);
    }

    async fn is_revoked(&self, session_id: Uuid) -> bool {
        let now = Utc::now().timestamp();
        self.entries
            .read()
            .await
            .get(&session_id)
            .is_some_and(|expiry| *expiry > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revoked_session() {
        let store = InMemoryRevocationStore::new();
        let sid = Uuid::new_v4();

        assert!(!store.is_revoked(sid).await);
        store.revoke(sid, Utc::now().timestamp() + 60).await;
        assert!(store.is_revoked(sid).await);
        assert!(!store.is_revoked(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_expired_entry_is_not_revoked() {
        let store = InMemoryRevocationStore::new();
        let sid = Uuid::new_v4();

        store.revoke(sid, Utc::now().timestamp() - 1).await;
        assert!(!store.is_revoked(sid).await);
    }

    #[tokio::test]
    async fn test_expired_entries_purged_on_write() {
        let store = InMemoryRevocationStore::new();
        let now = Utc::now().timestamp();

        store.revoke(Uuid::new_v4(), now - 10).await;
        store.revoke(Uuid::new_v4(), now - 5).await;
        assert_eq!(store.len().await, 1);

        store.revoke(Uuid::new_v4(), now + 60).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_revoke_never_shortens_expiry() {
        let store = InMemoryRevocationStore::new();
        let sid = Uuid::new_v4();
        let now = Utc::now().timestamp();

        store.revoke(sid, now + 600).await;
        store.revoke(sid, now - 600).await;
        assert!(store.is_revoked(sid).await);
    }
}

//! In-process [`CredentialStore`] used by tests and local runs without PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use warden_models::{Identity, NewIdentity};

use crate::store::{CredentialStore, EMAIL_UNIQUE_CONSTRAINT, StoreError};

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    by_id: HashMap<i64, Identity>,
}

impl Rows {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.by_id
            .values()
            .any(|row| row.email == email && Some(row.id) != except)
    }
}

/// Identities held in memory. Uniqueness checks and inserts happen under one write
/// lock, so concurrent creates with the same email admit exactly one.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    rows: RwLock<Rows>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.by_id.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.by_id.values().find(|row| row.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError> {
        Ok(self.rows.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Identity>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.by_id.values().find(|row| row.uuid == uuid).cloned())
    }

    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let mut rows = self.rows.write().await;

        if rows.email_taken(&new.email, None) {
            return Err(StoreError::UniqueViolation {
                constraint: EMAIL_UNIQUE_CONSTRAINT.to_string(),
            });
        }
        if rows.by_id.values().any(|row| row.uuid == new.uuid) {
            return Err(StoreError::UniqueViolation {
                constraint: "users_uuid_key".to_string(),
            });
        }

        rows.next_id += 1;
        let now = Utc::now();
        let identity = Identity {
            id: rows.next_id,
            uuid: new.uuid,
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        rows.by_id.insert(identity.id, identity.clone());

        Ok(identity)
    }

    async fn update(&self, identity: &Identity) -> Result<Identity, StoreError> {
        let mut rows = self.rows.write().await;

        if !rows.by_id.contains_key(&identity.id) {
            return Err(StoreError::NotFound);
        }
        if rows.email_taken(&identity.email, Some(identity.id)) {
            return Err(StoreError::UniqueViolation {
                constraint: EMAIL_UNIQUE_CONSTRAINT.to_string(),
            });
        }

        let row = rows.by_id.get_mut(&identity.id).ok_or(StoreError::NotFound)?;
        row.email = identity.email.clone();
        row.password_hash = identity.password_hash.clone();
        row.name = identity.name.clone();
        row.is_active = identity.is_active;
        row.updated_at = Utc::now();

        Ok(row.clone())
    }

    async fn update_name(&self, id: i64, name: &str) -> Result<Identity, StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows.by_id.get_mut(&id).ok_or(StoreError::NotFound)?;
        row.name = name.to_string();
        row.updated_at = Utc::now();

        Ok(row.clone())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Identity, StoreError> {
        let mut rows = self.rows.write().await;
        let row = rows.by_id.get_mut(&id).ok_or(StoreError::NotFound)?;
        row.is_active = active;
        row.updated_at = Utc::now();

        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_identity(email: &str) -> NewIdentity {
        NewIdentity::new(email, "hash".to_string(), "Ann")
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryCredentialStore::new();
        let created = store.create(new_identity("a@x.com")).await.unwrap();

        assert_eq!(created.id, 1);
        assert!(created.is_active);
        assert_eq!(
            store.find_by_email("a@x.com").await.unwrap(),
            Some(created.clone())
        );
        assert_eq!(store.find_by_id(1).await.unwrap(), Some(created.clone()));
        assert_eq!(
            store.find_by_uuid(created.uuid).await.unwrap(),
            Some(created)
        );
        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryCredentialStore::new();
        store.create(new_identity("a@x.com")).await.unwrap();

        let err = store.create(new_identity("A@X.com ")).await.unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_admit_one() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create(new_identity("race@x.com")).await })
            })
            .collect();

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update() {
        let store = InMemoryCredentialStore::new();
        let mut identity = store.create(new_identity("a@x.com")).await.unwrap();

        identity.name = "Ann Smith".to_string();
        identity.is_active = false;
        let updated = store.update(&identity).await.unwrap();

        assert_eq!(updated.name, "Ann Smith");
        assert!(!updated.is_active);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let store = InMemoryCredentialStore::new();
        let mut identity = store.create(new_identity("a@x.com")).await.unwrap();
        identity.id = 99;

        assert!(matches!(
            store.update(&identity).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_missing_with_taken_email() {
        let store = InMemoryCredentialStore::new();
        store.create(new_identity("a@x.com")).await.unwrap();
        let mut ghost = store.create(new_identity("b@x.com")).await.unwrap();
        ghost.id = 99;
        ghost.email = "a@x.com".to_string();

        assert!(matches!(store.update(&ghost).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_single_column_updates() {
        let store = InMemoryCredentialStore::new();
        let created = store.create(new_identity("a@x.com")).await.unwrap();

        let deactivated = store.set_active(created.id, false).await.unwrap();
        assert!(!deactivated.is_active);
        assert_eq!(deactivated.name, created.name);

        let renamed = store.update_name(created.id, "Ann B").await.unwrap();
        assert_eq!(renamed.name, "Ann B");
        assert!(!renamed.is_active);
        assert_eq!(renamed.password_hash, created.password_hash);

        assert!(matches!(
            store.update_name(99, "Nobody").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.set_active(99, true).await,
            Err(StoreError::NotFound)
        ));
    }
}

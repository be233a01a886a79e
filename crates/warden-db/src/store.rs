use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use warden_models::{Identity, NewIdentity};

/// Name of the unique constraint guarding email addresses.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("identity not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

/// Lookup, creation and update of identities.
///
/// Emails are passed already normalized; implementations compare them verbatim.
/// Uniqueness of `email` is enforced here, atomically with the insert, and reported as
/// [`StoreError::UniqueViolation`].
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError>;

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Identity>, StoreError>;

    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError>;

    /// Persists every mutable column of `identity` and bumps `updated_at`.
    ///
    /// Overwrites columns another writer may have changed since `identity` was read.
    /// Prefer the single-column updates below for partial changes.
    async fn update(&self, identity: &Identity) -> Result<Identity, StoreError>;

    /// Sets only `name`. Returns [`StoreError::NotFound`] for an unknown id.
    async fn update_name(&self, id: i64, name: &str) -> Result<Identity, StoreError>;

    /// Sets only `is_active`. Returns [`StoreError::NotFound`] for an unknown id.
    async fn set_active(&self, id: i64, active: bool) -> Result<Identity, StoreError>;
}

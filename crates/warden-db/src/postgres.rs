use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use warden_models::{Identity, NewIdentity};

use crate::store::{CredentialStore, StoreError};

const IDENTITY_COLUMNS: &str =
    "id, uuid, email, password_hash, name, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return StoreError::UniqueViolation {
            constraint: db_err.constraint().unwrap_or("unknown").to_string(),
        };
    }
    StoreError::Database(e)
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    #[instrument(skip(self), fields(db.table = "users"))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let identity = sqlx::query_as::<_, Identity>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            IDENTITY_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }

    #[instrument(skip(self), fields(db.table = "users"))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Identity>, StoreError> {
        let identity = sqlx::query_as::<_, Identity>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            IDENTITY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }

    #[instrument(skip(self), fields(db.table = "users"))]
    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Identity>, StoreError> {
        let identity = sqlx::query_as::<_, Identity>(&format!(
            "SELECT {} FROM users WHERE uuid = $1",
            IDENTITY_COLUMNS
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }

    #[instrument(skip(self, new), fields(db.table = "users", user.email = %new.email))]
    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        sqlx::query_as::<_, Identity>(&format!(
            "INSERT INTO users (uuid, email, password_hash, name, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            IDENTITY_COLUMNS
        ))
        .bind(new.uuid)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.name)
        .bind(new.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    #[instrument(skip(self, identity), fields(db.table = "users", user.id = identity.id))]
    async fn update(&self, identity: &Identity) -> Result<Identity, StoreError> {
        sqlx::query_as::<_, Identity>(&format!(
            "UPDATE users
             SET email = $2, password_hash = $3, name = $4, is_active = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            IDENTITY_COLUMNS
        ))
        .bind(identity.id)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(&identity.name)
        .bind(identity.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self, name), fields(db.table = "users", user.id = id))]
    async fn update_name(&self, id: i64, name: &str) -> Result<Identity, StoreError> {
        sqlx::query_as::<_, Identity>(&format!(
            "UPDATE users SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            IDENTITY_COLUMNS
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self), fields(db.table = "users", user.id = id))]
    async fn set_active(&self, id: i64, active: bool) -> Result<Identity, StoreError> {
        sqlx::query_as::<_, Identity>(&format!(
            "UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            IDENTITY_COLUMNS
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }
}

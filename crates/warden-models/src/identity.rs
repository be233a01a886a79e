//! Identity entity and its public projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Canonical form used for storage and lookup: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A stored identity.
///
/// `email` is always normalized and unique. `password_hash` never leaves the server:
/// it is skipped on serialization and absent from [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Identity {
    pub id: i64,
    pub uuid: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub uuid: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_active: bool,
}

impl NewIdentity {
    /// An active identity with a fresh v4 UUID. Email is normalized and name trimmed.
    pub fn new(email: &str, password_hash: String, name: &str) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash,
            name: name.trim().to_string(),
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    #[schema(example = 1)]
    pub id: i64,
    pub uuid: Uuid,
    #[schema(example = "ann@example.com")]
    pub email: String,
    #[schema(example = "Ann")]
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for UserProfile {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            uuid: identity.uuid,
            email: identity.email.clone(),
            name: identity.name.clone(),
            is_active: identity.is_active,
            created_at: identity.created_at,
        }
    }
}

impl From<Identity> for UserProfile {
    fn from(identity: Identity) -> Self {
        Self::from(&identity)
    }
}

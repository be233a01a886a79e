//! Account operations that the HTTP API does not expose.

use std::fmt;

use fake::Fake;
use fake::faker::name::en::Name;
use thiserror::Error;

use warden_core::{HashingError, PasswordHasher};
use warden_db::{CredentialStore, StoreError};
use warden_models::validation::{
    validate_email_field, validate_name_field, validate_new_password,
};
use warden_models::{Identity, NewIdentity, normalize_email};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),

    #[error("a user with email '{0}' already exists")]
    AlreadyExists(String),

    #[error("no user with email '{0}'")]
    NotFound(String),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] HashingError),

    #[error("database error: {0}")]
    Store(#[from] StoreError),
}

pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("name", &self.name)
            .finish()
    }
}

fn check(result: Result<(), validator::ValidationError>) -> Result<(), AdminError> {
    result.map_err(|e| {
        AdminError::Validation(
            e.message
                .map(|m| m.into_owned())
                .unwrap_or_else(|| e.code.into_owned()),
        )
    })
}

/// Applies the same field rules as registration.
pub fn validate_account(account: &NewAccount) -> Result<(), AdminError> {
    check(validate_email_field(&account.email))?;
    check(validate_new_password(&account.password))?;
    check(validate_name_field(&account.name))?;
    Ok(())
}

pub async fn create_user(
    store: &dyn CredentialStore,
    hasher: &PasswordHasher,
    account: NewAccount,
) -> Result<Identity, AdminError> {
    validate_account(&account)?;

    let email = normalize_email(&account.email);
    if store.find_by_email(&email).await?.is_some() {
        return Err(AdminError::AlreadyExists(email));
    }

    let password_hash = hasher.hash(&account.password).await?;
    store
        .create(NewIdentity::new(&email, password_hash, &account.name))
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                AdminError::AlreadyExists(email.clone())
            } else {
                AdminError::Store(e)
            }
        })
}

pub async fn find_user(store: &dyn CredentialStore, email: &str) -> Result<Identity, AdminError> {
    let email = normalize_email(email);
    store
        .find_by_email(&email)
        .await?
        .ok_or(AdminError::NotFound(email))
}

/// Returns the updated identity, or the unchanged one if the flag already matched.
pub async fn set_active(
    store: &dyn CredentialStore,
    email: &str,
    active: bool,
) -> Result<Identity, AdminError> {
    let identity = find_user(store, email).await?;
    if identity.is_active == active {
        return Ok(identity);
    }

    match store.set_active(identity.id, active).await {
        Err(StoreError::NotFound) => Err(AdminError::NotFound(identity.email)),
        other => Ok(other?),
    }
}

/// Inserts `count` accounts with generated names, all sharing `password`.
///
/// The password is hashed once. Emails follow `seed-<n>@<domain>`; existing ones are
/// skipped, so re-running only fills gaps. Returns how many were created.
pub async fn seed_users(
    store: &dyn CredentialStore,
    hasher: &PasswordHasher,
    count: usize,
    password: &str,
    domain: &str,
) -> Result<usize, AdminError> {
    check(validate_new_password(password))?;
    let password_hash = hasher.hash(password).await?;

    let mut created = 0;
    for n in 1..=count {
        let email = format!("seed-{n}@{domain}");
        check(validate_email_field(&email))?;

        let name: String = Name().fake();
        match store
            .create(NewIdentity::new(&email, password_hash.clone(), &name))
            .await
        {
            Ok(_) => created += 1,
            Err(e) if e.is_unique_violation() => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_db::InMemoryCredentialStore;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4, 2)
    }

    fn account(email: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            password: "password123".to_string(),
            name: "Admin Created".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_normalizes_and_hashes() {
        let store = InMemoryCredentialStore::new();
        let hasher = hasher();

        let identity = create_user(&store, &hasher, account(" Ops@Example.com "))
            .await
            .unwrap();

        assert_eq!(identity.email, "ops@example.com");
        assert!(identity.is_active);
        assert!(
            hasher
                .verify("password123", &identity.password_hash)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicates_and_bad_input() {
        let store = InMemoryCredentialStore::new();
        let hasher = hasher();
        create_user(&store, &hasher, account("dup@example.com"))
            .await
            .unwrap();

        let err = create_user(&store, &hasher, account("DUP@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::AlreadyExists(ref e) if e == "dup@example.com"));

        let mut short = account("short@example.com");
        short.password = "abc".to_string();
        let err = create_user(&store, &hasher, short).await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let err = create_user(&store, &hasher, account("not-an-email"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email format");

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_set_active_toggles() {
        let store = InMemoryCredentialStore::new();
        create_user(&store, &hasher(), account("toggle@example.com"))
            .await
            .unwrap();

        let identity = set_active(&store, "TOGGLE@example.com", false).await.unwrap();
        assert!(!identity.is_active);
        assert!(!find_user(&store, "toggle@example.com").await.unwrap().is_active);

        let identity = set_active(&store, "toggle@example.com", true).await.unwrap();
        assert!(identity.is_active);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = InMemoryCredentialStore::new();
        let err = set_active(&store, "ghost@example.com", false)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_seed_users_is_idempotent() {
        let store = InMemoryCredentialStore::new();
        let hasher = hasher();

        let created = seed_users(&store, &hasher, 3, "password123", "seed.test")
            .await
            .unwrap();
        assert_eq!(created, 3);

        let created = seed_users(&store, &hasher, 5, "password123", "seed.test")
            .await
            .unwrap();
        assert_eq!(created, 2);
        assert_eq!(store.len().await, 5);
        assert!(find_user(&store, "seed-4@seed.test").await.is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", account("a@example.com"));
        assert!(!rendered.contains("password123"));
    }
}

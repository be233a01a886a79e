//! Password hashing and verification.
//!
//! Hashing uses bcrypt with a per-hash random salt. bcrypt is deliberately slow, so every
//! call runs on Tokio's blocking pool and must first acquire a permit from a shared
//! semaphore. A burst of logins therefore queues instead of occupying every worker thread.
//!
//! bcrypt only reads the first 72 bytes of its input. Longer passwords are reduced to the
//! hex-encoded SHA-256 of the full password before hashing, so two long passwords that
//! share a 72-byte prefix still produce different digests.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::Semaphore;

const BCRYPT_MAX_INPUT_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password digest is malformed")]
    InvalidDigest,

    #[error("password worker unavailable: {0}")]
    WorkerUnavailable(String),
}

/// Bounded bcrypt hasher. Cloning shares the same permit pool.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    permits: Arc<Semaphore>,
}

impl PasswordHasher {
    /// Creates a hasher with the given bcrypt cost and at most `max_concurrency`
    /// simultaneous hash or verify operations (clamped to at least one).
    pub fn new(cost: u32, max_concurrency: usize) -> Self {
        Self {
            cost,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `password` with a fresh salt.
    ///
    /// # Errors
    ///
    /// Fails only when the worker pool is unavailable or bcrypt itself errors.
    pub async fn hash(&self, password: &str) -> Result<String, HashingError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| HashingError::WorkerUnavailable(e.to_string()))?;

        let input = prepare(password);
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(input, cost))
            .await
            .map_err(|e| HashingError::WorkerUnavailable(e.to_string()))?
            .map_err(|e| HashingError::Hash(e.to_string()))
    }

    /// Checks `password` against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch and [`HashingError::InvalidDigest`] when `digest`
    /// is not a bcrypt hash at all.
    pub async fn verify(&self, password: &str, digest: &str) -> Result<bool, HashingError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| HashingError::WorkerUnavailable(e.to_string()))?;

        let input = prepare(password);
        let digest = digest.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(input, &digest))
            .await
            .map_err(|e| HashingError::WorkerUnavailable(e.to_string()))?
            .map_err(|e| match e {
                bcrypt::BcryptError::InvalidHash(_)
                | bcrypt::BcryptError::InvalidPrefix(_)
                | bcrypt::BcryptError::InvalidCost(_)
                | bcrypt::BcryptError::InvalidSaltLen(_)
                | bcrypt::BcryptError::InvalidBase64(_) => HashingError::InvalidDigest,
                other => HashingError::Hash(other.to_string()),
            })
    }
}

fn prepare(password: &str) -> String {
    if password.len() > BCRYPT_MAX_INPUT_BYTES {
        hex::encode(Sha256::digest(password.as_bytes()))
    } else {
        password.to_owned()
    }
}

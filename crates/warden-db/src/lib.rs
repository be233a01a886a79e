//! # Warden DB
//!
//! Identity persistence for the Warden auth service.
//!
//! - [`store`]: the [`CredentialStore`] capability trait and [`StoreError`]
//! - [`postgres`]: [`PgCredentialStore`], backed by sqlx and PostgreSQL
//! - [`memory`]: [`InMemoryCredentialStore`] for tests and local development
//!
//! # Example
//!
//! ```ignore
//! use warden_config::DatabaseConfig;
//! use warden_db::{MIGRATOR, PgCredentialStore, init_db_pool};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! MIGRATOR.run(&pool).await?;
//! let store = PgCredentialStore::new(pool);
//! ```

pub mod memory;
pub mod postgres;
pub mod store;

use secrecy::ExposeSecret;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use warden_config::DatabaseConfig;

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;
pub use store::{CredentialStore, EMAIL_UNIQUE_CONSTRAINT, StoreError};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a PostgreSQL pool sized and bounded by `config`.
///
/// Requests waiting longer than `acquire_timeout` for a connection fail instead of
/// queueing indefinitely.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(config.url.expose_secret())
        .await
}

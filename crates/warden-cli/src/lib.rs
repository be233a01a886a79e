//! # Warden CLI
//!
//! Account administration for Warden, shared by the `warden-cli` binary and its tests.
//!
//! ## Usage
//!
//! ```ignore
//! use warden_cli::admin::{self, NewAccount};
//!
//! let store = PgCredentialStore::new(pool);
//! admin::create_user(&store, &hasher, NewAccount { email, password, name }).await?;
//! admin::set_active(&store, "user@example.com", false).await?;
//! ```

pub mod admin;

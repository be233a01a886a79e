//! # Warden Core
//!
//! Core types shared by every Warden crate.
//!
//! - [`errors`]: the error taxonomy and its HTTP response conversion
//! - [`password`]: bounded, salted password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use warden_core::{AppError, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(bcrypt::DEFAULT_COST, 4);
//! let digest = hasher.hash("secret1").await?;
//! assert!(hasher.verify("secret1", &digest).await?);
//!
//! let error = AppError::user_not_found();
//! assert_eq!(error.kind().code(), "USER_NOT_FOUND");
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind, ErrorResponse};
pub use password::{HashingError, PasswordHasher};

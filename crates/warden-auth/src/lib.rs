//! # Warden Auth
//!
//! Session token handling for the Warden auth service.
//!
//! - [`claims`]: tagged access and refresh claim sets
//! - [`jwt`]: [`TokenCodec`] for issuing and verifying HS256 tokens
//! - [`bearer`]: strict `Authorization: Bearer <token>` parsing
//! - [`revocation`]: session denylist consulted on every authenticated request
//!
//! # Token Types
//!
//! - **Access token** ([`AccessClaims`]): 15 minutes by default, authorizes requests
//! - **Refresh token** ([`RefreshClaims`]): 7 days by default, only mints new pairs
//!
//! Both carry the session id (`sid`) minted at login. Refreshing keeps the `sid`, so
//! revoking it ends the whole login lineage.

pub mod bearer;
pub mod claims;
pub mod jwt;
pub mod revocation;

// Re-export commonly used types at crate root
pub use bearer::extract_bearer;
pub use claims::{AccessClaims, RefreshClaims, TokenClaims, TokenKind};
pub use jwt::{IssuedToken, TokenCodec, TokenError, TokenPair};
pub use revocation::{InMemoryRevocationStore, RevocationStore};

//! Request authentication.
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. [`auth::require_auth`] verifies the access token and checks its session against
//!    the revocation store
//! 3. On success a [`auth::CurrentUser`] is placed in the request extensions
//! 4. Handlers receive it through the [`auth::AuthUser`] extractor
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn get_profile(AuthUser(user): AuthUser) -> impl IntoResponse {
//!     format!("user {}", user.user_id)
//! }
//! ```

pub mod auth;

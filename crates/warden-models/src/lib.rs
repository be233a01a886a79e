//! # Warden Models
//!
//! Identity records and the request/response bodies of the Warden API.
//!
//! - [`identity`]: the stored [`Identity`], its insert payload and public [`UserProfile`]
//! - [`auth`]: register, login, refresh and profile DTOs
//! - [`validation`]: field rules and conversion of validation failures into `AppError`

pub mod auth;
pub mod identity;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use auth::{
    AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest,
    UpdateProfileRequest,
};
pub use identity::{Identity, NewIdentity, UserProfile, normalize_email};

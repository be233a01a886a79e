//! Request and response bodies of the authentication endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::identity::UserProfile;
use crate::validation::{
    validate_email_field, validate_name_field, validate_new_password, validate_present_password,
};

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_email_field"))]
    #[schema(example = "ann@example.com")]
    pub email: String,
    #[validate(custom(function = "validate_new_password"))]
    #[schema(example = "secret1", min_length = 6, max_length = 128)]
    pub password: String,
    #[validate(custom(function = "validate_name_field"))]
    #[schema(example = "Ann", min_length = 2, max_length = 100)]
    pub name: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_email_field"))]
    #[schema(example = "ann@example.com")]
    pub email: String,
    #[validate(custom(function = "validate_present_password"))]
    #[schema(example = "secret1")]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Request to exchange a refresh token for a new token pair.
#[derive(Clone, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

impl fmt::Debug for RefreshTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTokenRequest")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "validate_name_field"))]
    #[schema(example = "Ann Smith", min_length = 2, max_length = 100)]
    pub name: String,
}

/// Returned by register, login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    #[schema(example = 900)]
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logged out successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

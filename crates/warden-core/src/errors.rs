//! Application error taxonomy.
//!
//! Every domain failure carries an [`ErrorKind`], a human-readable message and an
//! optional detail string. The kind decides the HTTP status and the machine-readable
//! `code` sent to clients. Server-side kinds ([`ErrorKind::Database`] and
//! [`ErrorKind::Internal`]) never expose their details or underlying cause; the cause
//! is logged instead.

use std::fmt;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Classification of every failure the service can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InvalidInput,
    MissingField,
    Unauthorized,
    InvalidCredentials,
    TokenExpired,
    TokenInvalid,
    UserNotFound,
    UserExists,
    UserInactive,
    Database,
    ConstraintViolation,
    Internal,
    ServiceUnavailable,
}

impl ErrorKind {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Validation | Self::InvalidInput | Self::MissingField => StatusCode::BAD_REQUEST,
            Self::Unauthorized
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::UserExists | Self::ConstraintViolation => StatusCode::CONFLICT,
            Self::UserInactive => StatusCode::FORBIDDEN,
            Self::Database | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Wire code carried in the `code` field of error bodies.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::InvalidInput => "INVALID_INPUT",
            Self::MissingField => "MISSING_FIELD",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UserExists => "USER_ALREADY_EXISTS",
            Self::UserInactive => "USER_INACTIVE",
            Self::Database => "DATABASE_ERROR",
            Self::ConstraintViolation => "CONSTRAINT_VIOLATION",
            Self::Internal => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Validation => "Validation failed",
            Self::InvalidInput => "Invalid input provided",
            Self::MissingField => "Required field is missing",
            Self::Unauthorized => "Unauthorized access",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",
            Self::UserNotFound => "User not found",
            Self::UserExists => "User already exists",
            Self::UserInactive => "User account is inactive",
            Self::Database => "Database operation failed",
            Self::ConstraintViolation => "Database constraint violation",
            Self::Internal => "Internal server error",
            Self::ServiceUnavailable => "Service temporarily unavailable",
        }
    }

    /// Kinds whose message, details and cause stay on the server.
    pub const fn is_server_side(self) -> bool {
        matches!(self, Self::Database | Self::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error body returned to clients: `{error, code, details?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Invalid email or password")]
    pub error: String,
    #[schema(example = "INVALID_CREDENTIALS")]
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    details: Option<String>,
    source: Option<Error>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Builds an error carrying the kind's default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source<E>(mut self, err: E) -> Self
    where
        E: Into<Error>,
    {
        self.source = Some(err.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn source(&self) -> Option<&Error> {
        self.source.as_ref()
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Validation,
            format!("Validation failed for field '{}'", field),
        )
        .with_details(message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::InvalidInput).with_details(message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::from_kind(ErrorKind::MissingField).with_details(format!("{} is required", field))
    }

    pub fn unauthorized() -> Self {
        Self::from_kind(ErrorKind::Unauthorized)
    }

    pub fn invalid_credentials() -> Self {
        Self::from_kind(ErrorKind::InvalidCredentials)
    }

    pub fn token_expired() -> Self {
        Self::from_kind(ErrorKind::TokenExpired)
    }

    pub fn token_invalid() -> Self {
        Self::from_kind(ErrorKind::TokenInvalid)
    }

    pub fn user_not_found() -> Self {
        Self::from_kind(ErrorKind::UserNotFound)
    }

    pub fn user_exists() -> Self {
        Self::from_kind(ErrorKind::UserExists)
    }

    pub fn user_inactive() -> Self {
        Self::from_kind(ErrorKind::UserInactive)
    }

    pub fn database<E>(operation: &str, err: E) -> Self
    where
        E: Into<Error>,
    {
        let err = err.into();
        Self::new(ErrorKind::Database, format!("Database {} failed", operation))
            .with_details(err.to_string())
            .with_source(err)
    }

    pub fn constraint_violation<E>(constraint: &str, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            ErrorKind::ConstraintViolation,
            format!("Constraint violation: {}", constraint),
        )
        .with_source(err)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::from_kind(ErrorKind::Internal).with_source(err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::ServiceUnavailable).with_details(message)
    }

    /// The body sent to the client. Server-side kinds are reduced to their generic
    /// message with no details.
    pub fn to_response_body(&self) -> ErrorResponse {
        if self.kind.is_server_side() {
            return ErrorResponse {
                error: self.kind.default_message().to_string(),
                code: self.kind.code().to_string(),
                details: None,
            };
        }

        ErrorResponse {
            error: self.message.clone(),
            code: self.kind.code().to_string(),
            details: self.details.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)?;
        if let Some(source) = &self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.kind.is_server_side() {
            tracing::error!(
                error.code = self.kind.code(),
                error.message = %self.message,
                error.details = ?self.details,
                error.cause = ?self.source,
                "Request failed with server error"
            );
        } else {
            tracing::debug!(
                error.code = self.kind.code(),
                error.message = %self.message,
                "Request rejected"
            );
        }

        (status, Json(self.to_response_body())).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::MissingField.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::UserExists.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::UserInactive.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::ConstraintViolation.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorKind::Database.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorKind::ServiceUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(ErrorKind::UserExists.code(), "USER_ALREADY_EXISTS");
        assert_eq!(ErrorKind::InvalidCredentials.code(), "INVALID_CREDENTIALS");
        assert_eq!(ErrorKind::Internal.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_validation_error_carries_field() {
        let error = AppError::validation("name", "Name must be at least 2 characters");
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.message(), "Validation failed for field 'name'");
        assert_eq!(error.details(), Some("Name must be at least 2 characters"));
    }

    #[test]
    fn test_database_error_hides_details_from_body() {
        let error = AppError::database("user creation", anyhow::anyhow!("relation users does not exist"));
        assert!(error.details().is_some());

        let body = error.to_response_body();
        assert_eq!(body.code, "DATABASE_ERROR");
        assert_eq!(body.error, "Database operation failed");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_unknown_errors_become_internal() {
        let io = std::io::Error::other("disk on fire");
        let error: AppError = io.into();
        assert_eq!(error.kind(), ErrorKind::Internal);

        let body = error.to_response_body();
        assert_eq!(body.error, "Internal server error");
        assert!(!body.error.contains("disk"));
    }

    #[tokio::test]
    async fn test_into_response_shape() {
        let response = AppError::missing_field("refresh_token").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "MISSING_FIELD");
        assert_eq!(body["error"], "Required field is missing");
        assert_eq!(body["details"], "refresh_token is required");
    }

    #[tokio::test]
    async fn test_into_response_omits_empty_details() {
        let response = AppError::invalid_credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.get("details").is_none());
    }
}

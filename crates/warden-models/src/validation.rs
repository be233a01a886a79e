//! Field rules shared by the request DTOs, and conversion of their failures into
//! [`AppError`].

use std::borrow::Cow;

use validator::{ValidateEmail, ValidationError, ValidationErrors};
use warden_core::AppError;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 128;

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_email_field(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(violation("required", "Email is required"));
    }
    if !email.validate_email() {
        return Err(violation("email", "Invalid email format"));
    }
    Ok(())
}

/// Name rules apply to the trimmed value.
pub fn validate_name_field(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(violation("required", "Name is required"));
    }
    let len = name.chars().count();
    if len < NAME_MIN_CHARS {
        return Err(violation("length", "Name must be at least 2 characters"));
    }
    if len > NAME_MAX_CHARS {
        return Err(violation("length", "Name must be less than 100 characters"));
    }
    Ok(())
}

/// Passwords are never trimmed.
pub fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(violation("required", "Password is required"));
    }
    let len = password.chars().count();
    if len < PASSWORD_MIN_CHARS {
        return Err(violation("length", "Password must be at least 6 characters"));
    }
    if len > PASSWORD_MAX_CHARS {
        return Err(violation(
            "length",
            "Password must be less than 128 characters",
        ));
    }
    Ok(())
}

pub fn validate_present_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(violation("required", "Password is required"));
    }
    Ok(())
}

/// Reduces a set of failures to a single `Validation` error naming one field.
///
/// Fields are considered in name order so the reported field is deterministic.
pub fn into_app_error(errors: &ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                AppError::validation(field.as_ref(), message)
            })
        })
        .unwrap_or_else(|| AppError::invalid_input("Request failed validation"))
}

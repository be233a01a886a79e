use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use warden_core::AppError;

/// JSON body extractor whose rejections use the service's error taxonomy.
///
/// Only the shape is checked here; field rules are applied by the service so they hold
/// for every caller, not just HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

fn map_rejection(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::invalid_input("Missing 'Content-Type: application/json' header");
    }

    let error_msg = rejection.body_text();

    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return AppError::missing_field(field);
    }

    if error_msg.contains("invalid type") {
        return AppError::invalid_input("Invalid field type in request");
    }

    AppError::invalid_input("Invalid request body")
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(map_rejection)?;

        Ok(JsonBody(value))
    }
}

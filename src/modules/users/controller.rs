use axum::{Json, extract::State};
use tracing::instrument;

use warden_core::{AppError, ErrorResponse};
use warden_models::{MessageResponse, UpdateProfileRequest, UserProfile};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::JsonBody;

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state), fields(user.id = user.user_id))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.sessions.get_profile(user.user_id).await?;
    Ok(Json(profile))
}

/// Update the authenticated user's display name
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto), fields(user.id = user.user_id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(dto): JsonBody<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.sessions.update_profile(user.user_id, dto).await?;
    Ok(Json(MessageResponse::new("Profile updated successfully")))
}

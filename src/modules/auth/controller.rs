use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use warden_core::{AppError, ErrorResponse};
use warden_models::{
    AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest,
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::JsonBody;

/// Register a new account and start a session
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error or malformed body", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = state.sessions.register(dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error or malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 403, description = "Account is inactive", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.sessions.login(dto).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = AuthResponse),
        (status = 400, description = "Missing refresh token", body = ErrorResponse),
        (status = 401, description = "Invalid, expired or revoked refresh token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_tokens(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<RefreshTokenRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.sessions.refresh(dto).await?;
    Ok(Json(response))
}

/// Revoke the current session
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Session revoked", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip(state), fields(user.id = user.user_id))]
pub async fn logout_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    state.sessions.logout(user.session_id).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{login_user, logout_user, refresh_tokens, register_user};

/// Public endpoints, nested under `/auth`.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_tokens))
}

/// Endpoints that require a valid session.
pub fn init_session_router() -> Router<AppState> {
    Router::new().route("/logout", post(logout_user))
}

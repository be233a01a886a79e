use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use warden_auth::{AccessClaims, TokenError};
use warden_core::AppError;

use crate::metrics;
use crate::state::AppState;

/// Identity of an authenticated request, taken from a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    pub user_uuid: Uuid,
    pub session_id: Uuid,
    /// Access token expiry (Unix seconds)
    pub expires_at: i64,
}

impl From<AccessClaims> for CurrentUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.user_id,
            user_uuid: claims.user_uuid,
            session_id: claims.sid,
            expires_at: claims.exp,
        }
    }
}

/// Every failure looks the same to the client; the reason is only logged.
fn reject(err: TokenError) -> AppError {
    debug!(reason = err.reason(), error = %err, "Rejected bearer credential");
    metrics::track_token_rejection(err.reason());
    AppError::unauthorized()
}

/// Verifies the bearer token in `headers` and checks its session has not been revoked.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, AppError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| TokenError::MalformedHeader))
        .transpose()
        .map_err(reject)?;

    let claims = state.tokens.authenticate(raw).map_err(reject)?;

    if state.revocations.is_revoked(claims.sid).await {
        return Err(reject(TokenError::Revoked));
    }

    Ok(CurrentUser::from(claims))
}

/// Route layer guarding protected routes.
///
/// ```ignore
/// router.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Extractor yielding the authenticated [`CurrentUser`].
///
/// Reuses the identity attached by [`require_auth`] and falls back to verifying the
/// request itself when the layer is absent.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub CurrentUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(AuthUser(*user));
        }

        authenticate(state, &parts.headers).await.map(AuthUser)
    }
}

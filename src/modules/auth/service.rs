use std::sync::Arc;

use chrono::Utc;
use tracing::{Span, debug, field::Empty, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use warden_auth::{RevocationStore, TokenCodec, TokenError};
use warden_core::{AppError, PasswordHasher};
use warden_db::{CredentialStore, StoreError};
use warden_models::validation::into_app_error;
use warden_models::{
    AuthResponse, Identity, LoginRequest, NewIdentity, RefreshTokenRequest, RegisterRequest,
    UpdateProfileRequest, UserProfile, normalize_email,
};

use crate::metrics;

/// Orchestrates the account and session lifecycle: register, login, refresh, logout and
/// profile reads and updates.
///
/// All collaborators are injected. The service holds no per-session state besides what
/// it writes to the revocation store on logout.
pub struct SessionService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenCodec>,
    revocations: Arc<dyn RevocationStore>,
}

fn database_error(operation: &str, err: StoreError) -> AppError {
    warn!(db.operation = operation, error = %err, "Credential store failure");
    AppError::database(operation, err)
}

impl SessionService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenCodec>,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            revocations,
        }
    }

    #[instrument(skip(self, req), fields(user.email = Empty, user.id = Empty))]
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        req.validate().map_err(|e| into_app_error(&e))?;

        let email = normalize_email(&req.email);
        Span::current().record("user.email", email.as_str());

        let existing = self
            .store
            .find_by_email(&email)
            .await
            .map_err(|e| database_error("user lookup", e))?;
        if existing.is_some() {
            warn!("Attempted to register with existing email");
            return Err(AppError::user_exists());
        }

        let password_hash = self
            .hasher
            .hash(&req.password)
            .await
            .map_err(AppError::internal)?;

        let identity = self
            .store
            .create(NewIdentity::new(&email, password_hash, &req.name))
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    warn!("Registration lost a race on the email unique constraint");
                    return AppError::user_exists();
                }
                database_error("user creation", e)
            })?;

        Span::current().record("user.id", identity.id);
        metrics::track_registration();
        info!("User registered");

        self.start_session(&identity)
    }

    #[instrument(skip(self, req), fields(user.email = Empty, user.id = Empty))]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        req.validate().map_err(|e| into_app_error(&e))?;

        let email = normalize_email(&req.email);
        Span::current().record("user.email", email.as_str());

        let Some(identity) = self
            .store
            .find_by_email(&email)
            .await
            .map_err(|e| database_error("user lookup", e))?
        else {
            debug!("Login for unknown email");
            metrics::track_login_failure("unknown_email");
            return Err(AppError::invalid_credentials());
        };
        Span::current().record("user.id", identity.id);

        if !identity.is_active {
            warn!("Login attempt on inactive account");
            metrics::track_login_failure("inactive");
            return Err(AppError::user_inactive());
        }

        let valid = self
            .hasher
            .verify(&req.password, &identity.password_hash)
            .await
            .map_err(AppError::internal)?;
        if !valid {
            debug!("Login with wrong password");
            metrics::track_login_failure("wrong_password");
            return Err(AppError::invalid_credentials());
        }

        metrics::track_login_success();
        info!("User logged in");

        self.start_session(&identity)
    }

    /// Exchanges a refresh token for a new pair on the same session.
    ///
    /// The presented refresh token is not invalidated, and the account's active flag is
    /// not re-checked.
    #[instrument(skip(self, req), fields(user.id = Empty, session.id = Empty))]
    pub async fn refresh(&self, req: RefreshTokenRequest) -> Result<AuthResponse, AppError> {
        if req.refresh_token.trim().is_empty() {
            return Err(AppError::missing_field("refresh_token"));
        }

        let claims = self
            .tokens
            .decode_refresh(&req.refresh_token)
            .map_err(reject_refresh)?;
        Span::current().record("session.id", tracing::field::display(claims.sid));

        if self.revocations.is_revoked(claims.sid).await {
            return Err(reject_refresh(TokenError::Revoked));
        }

        let identity = self
            .store
            .find_by_uuid(claims.user_uuid)
            .await
            .map_err(|e| database_error("user lookup", e))?
            .ok_or_else(AppError::user_not_found)?;
        Span::current().record("user.id", identity.id);

        let response = self.issue(&identity, claims.sid)?;
        info!("Tokens refreshed");
        Ok(response)
    }

    /// Revokes every token of `session_id` for as long as any of them could still decode.
    #[instrument(skip(self))]
    pub async fn logout(&self, session_id: Uuid) -> Result<(), AppError> {
        // A token is accepted up to and including `exp + leeway`.
        let until = Utc::now().timestamp()
            + self.tokens.refresh_ttl_secs()
            + self.tokens.leeway_secs()
            + 1;
        self.revocations.revoke(session_id, until).await;

        metrics::track_logout();
        info!("Session revoked");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: i64) -> Result<UserProfile, AppError> {
        let identity = self.find_identity(user_id).await?;
        Ok(UserProfile::from(identity))
    }

    #[instrument(skip(self, req))]
    pub async fn update_profile(
        &self,
        user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        req.validate().map_err(|e| into_app_error(&e))?;

        let updated = self
            .store
            .update_name(user_id, req.name.trim())
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::user_not_found(),
                e => database_error("user update", e),
            })?;

        info!("Profile updated");
        Ok(UserProfile::from(updated))
    }

    async fn find_identity(&self, user_id: i64) -> Result<Identity, AppError> {
        self.store
            .find_by_id(user_id)
            .await
            .map_err(|e| database_error("user lookup", e))?
            .ok_or_else(AppError::user_not_found)
    }

    fn start_session(&self, identity: &Identity) -> Result<AuthResponse, AppError> {
        let sid = Uuid::new_v4();
        debug!(session.id = %sid, "Starting session");
        self.issue(identity, sid)
    }

    fn issue(&self, identity: &Identity, sid: Uuid) -> Result<AuthResponse, AppError> {
        let pair = self
            .tokens
            .issue_pair(identity.id, identity.uuid, sid)
            .map_err(AppError::internal)?;

        metrics::track_tokens_issued("access");
        metrics::track_tokens_issued("refresh");

        Ok(AuthResponse {
            user: UserProfile::from(identity),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
        })
    }
}

fn reject_refresh(err: TokenError) -> AppError {
    debug!(reason = err.reason(), "Refresh token rejected");
    metrics::track_token_rejection(err.reason());
    AppError::token_invalid()
}

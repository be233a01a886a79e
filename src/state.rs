use std::sync::Arc;
use std::time::Duration;

use warden_auth::{InMemoryRevocationStore, RevocationStore, TokenCodec};
use warden_config::{CorsConfig, JwtConfig};
use warden_core::PasswordHasher;
use warden_db::CredentialStore;

use crate::modules::auth::service::SessionService;

/// Shared handles passed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub tokens: Arc<TokenCodec>,
    pub revocations: Arc<dyn RevocationStore>,
    pub cors_config: CorsConfig,
    pub request_timeout: Duration,
}

impl AppState {
    /// Wires the session service, token codec and a process-local revocation store
    /// around `store`.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        jwt_config: &JwtConfig,
        cors_config: CorsConfig,
        request_timeout: Duration,
    ) -> Self {
        let tokens = Arc::new(TokenCodec::new(jwt_config));
        let revocations: Arc<dyn RevocationStore> = Arc::new(InMemoryRevocationStore::new());
        let sessions = Arc::new(SessionService::new(
            store,
            hasher,
            Arc::clone(&tokens),
            Arc::clone(&revocations),
        ));

        Self {
            sessions,
            tokens,
            revocations,
            cors_config,
            request_timeout,
        }
    }
}

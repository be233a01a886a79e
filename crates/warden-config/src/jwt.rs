//! Token signing configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret, at least 32 bytes (required)
//! - `JWT_ACCESS_EXPIRY`: access token lifetime in seconds (default: 900)
//! - `JWT_REFRESH_EXPIRY`: refresh token lifetime in seconds (default: 604800)
//! - `JWT_LEEWAY`: clock skew tolerance in seconds when checking expiry (default: 0)

use secrecy::{ExposeSecret, Secret};

use crate::env::{self, ConfigError};

pub const MIN_SECRET_LEN: usize = 32;
pub const DEFAULT_ACCESS_EXPIRY_SECS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// The secret is wrapped in [`Secret`] so `Debug` output never contains it.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
    pub leeway: u64,
}

impl JwtConfig {
    /// Default lifetimes with the given secret. The secret is not validated.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret.into()),
            access_token_expiry: DEFAULT_ACCESS_EXPIRY_SECS,
            refresh_token_expiry: DEFAULT_REFRESH_EXPIRY_SECS,
            leeway: 0,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            secret: Secret::new(env::required(&lookup, "JWT_SECRET")?),
            access_token_expiry: env::parse_or(
                &lookup,
                "JWT_ACCESS_EXPIRY",
                DEFAULT_ACCESS_EXPIRY_SECS,
            )?,
            refresh_token_expiry: env::parse_or(
                &lookup,
                "JWT_REFRESH_EXPIRY",
                DEFAULT_REFRESH_EXPIRY_SECS,
            )?,
            leeway: env::parse_or(&lookup, "JWT_LEEWAY", 0)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(ConfigError::invalid(
                "JWT_SECRET",
                format!("must be at least {} bytes", MIN_SECRET_LEN),
            ));
        }

        if self.access_token_expiry <= 0 {
            return Err(ConfigError::invalid("JWT_ACCESS_EXPIRY", "must be positive"));
        }

        // Logout revokes a session for the refresh lifetime, which must cover access tokens.
        if self.refresh_token_expiry < self.access_token_expiry {
            return Err(ConfigError::invalid(
                "JWT_REFRESH_EXPIRY",
                "must not be shorter than JWT_ACCESS_EXPIRY",
            ));
        }

        Ok(())
    }
}

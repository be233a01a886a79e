//! # Warden Config
//!
//! Configuration types for the Warden auth service, loaded from environment variables.
//!
//! - [`jwt`]: token signing secret and lifetimes
//! - [`hasher`]: bcrypt cost and hashing concurrency
//! - [`server`]: listener address, request timeout, metrics listener
//! - [`database`]: PostgreSQL pool settings
//! - [`cors`]: allowed origins
//! - [`logging`]: log level, format and file output
//!
//! Every `from_env` constructor has a `from_lookup` twin taking a variable lookup
//! function, which is what the tests use.
//!
//! # Example
//!
//! ```ignore
//! use warden_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! println!("listening on {}", config.server.addr);
//! ```

mod env;

pub mod cors;
pub mod database;
pub mod hasher;
pub mod jwt;
pub mod logging;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use env::ConfigError;
pub use hasher::HasherConfig;
pub use jwt::JwtConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Everything the server binary needs at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub hasher: HasherConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            jwt: JwtConfig::from_lookup(&lookup)?,
            hasher: HasherConfig::from_lookup(&lookup)?,
            server: ServerConfig::from_lookup(&lookup)?,
            database: DatabaseConfig::from_lookup(&lookup)?,
            cors: CorsConfig::from_lookup(&lookup),
            logging: LoggingConfig::from_lookup(&lookup)?,
        })
    }
}

use std::net::SocketAddr;
use std::time::Duration;

use crate::env::{self, ConfigError};

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP listener settings.
///
/// `METRICS_ADDR` is optional; when unset no Prometheus listener is started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub request_timeout: Duration,
    pub metrics_addr: Option<SocketAddr>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr: SocketAddr = match env::parse_opt(&lookup, "SERVER_ADDR")? {
            Some(addr) => addr,
            None => DEFAULT_SERVER_ADDR
                .parse::<SocketAddr>()
                .map_err(|e| ConfigError::invalid("SERVER_ADDR", format!("{}", e)))?,
        };

        let timeout_secs: u64 =
            env::parse_or(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::invalid("REQUEST_TIMEOUT_SECS", "must be positive"));
        }

        Ok(Self {
            addr,
            request_timeout: Duration::from_secs(timeout_secs),
            metrics_addr: env::parse_opt(&lookup, "METRICS_ADDR")?,
        })
    }
}

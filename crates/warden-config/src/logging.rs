use std::path::PathBuf;
use std::str::FromStr;

use crate::env::{self, ConfigError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" | "pretty" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Console and file logging settings.
///
/// `LOG_LEVEL` is used as the filter directive when `RUST_LOG` is not set.
/// When `LOG_DIR` is set a daily-rolling JSON log is also written there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            level: env::string(&lookup, "LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: env::parse_or(&lookup, "LOG_FORMAT", LogFormat::Compact)?,
            dir: env::string(&lookup, "LOG_DIR").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::lookup_from;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_json_format_and_dir() {
        let config = LoggingConfig::from_lookup(lookup_from(&[
            ("LOG_FORMAT", "JSON"),
            ("LOG_DIR", "storage/logs"),
            ("LOG_LEVEL", "warden=debug"),
        ]))
        .unwrap();

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.dir, Some(PathBuf::from("storage/logs")));
        assert_eq!(config.level, "warden=debug");
    }

    #[test]
    fn test_unknown_format() {
        let err = LoggingConfig::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "LOG_FORMAT", .. }));
    }
}

//! Password hasher tuning.
//!
//! - `BCRYPT_COST`: bcrypt work factor, 4 to 31 (default: 12)
//! - `HASHER_MAX_CONCURRENCY`: simultaneous hash/verify operations (default: available parallelism)

use crate::env::{self, ConfigError};

pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HasherConfig {
    pub cost: u32,
    pub max_concurrency: usize,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
            max_concurrency: default_concurrency(),
        }
    }
}

impl HasherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env::process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cost = env::parse_or(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(ConfigError::invalid(
                "BCRYPT_COST",
                format!("must be between {} and {}", MIN_BCRYPT_COST, MAX_BCRYPT_COST),
            ));
        }

        let max_concurrency =
            env::parse_or(&lookup, "HASHER_MAX_CONCURRENCY", default_concurrency())?;
        if max_concurrency == 0 {
            return Err(ConfigError::invalid(
                "HASHER_MAX_CONCURRENCY",
                "must be at least 1",
            ));
        }

        Ok(Self {
            cost,
            max_concurrency,
        })
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::lookup_from;

    #[test]
    fn test_defaults() {
        let config = HasherConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.cost, 12);
        assert!(config.max_concurrency >= 1);
    }

    #[test]
    fn test_cost_out_of_range() {
        for cost in ["3", "32"] {
            let err = HasherConfig::from_lookup(lookup_from(&[("BCRYPT_COST", cost)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "BCRYPT_COST", .. }));
        }
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = HasherConfig::from_lookup(lookup_from(&[("HASHER_MAX_CONCURRENCY", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "HASHER_MAX_CONCURRENCY",
                ..
            }
        ));
    }
}

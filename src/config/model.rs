// src/config/model.rs

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{DEFAULT_REGISTRY_CAPACITY, DEFAULT_SHARD_AMOUNT};

/// Top-level runtime config, mirror of `default.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Mirror of the `[logging]` table
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]            pub enable: bool,
    #[serde(default)]            pub file:   Option<String>,
    #[serde(default = "default_level")] pub level: String,
}
fn default_level() -> String { "INFO".into() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enable: false, file: None, level: default_level() }
    }
}

/// Mirror of the `[registry]` table
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Number of communications to reserve room for up front.
    #[serde(default = "default_capacity")]
    pub initial_capacity: usize,
    /// Number of independently locked shards; must be a power of two above 1.
    #[serde(default = "default_shard_amount")]
    pub shard_amount: usize,
}
fn default_capacity() -> usize { DEFAULT_REGISTRY_CAPACITY }
fn default_shard_amount() -> usize { DEFAULT_SHARD_AMOUNT }

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_capacity(),
            shard_amount:     default_shard_amount(),
        }
    }
}

/// All the ways config loading can go wrong
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("invalid shard amount {0}: must be a power of two greater than 1")]
    InvalidShardAmount(usize),

    #[error("registry capacity must be non-zero")]
    ZeroCapacity,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Config {
    /// Reject values the runtime cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;
        self.registry.validate()
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.level.to_uppercase().as_str() {
            "ERROR" | "WARN" | "INFO" | "DEBUG" | "TRACE" | "OFF" => Ok(()),
            _ => Err(ConfigError::InvalidLevel(self.level.clone())),
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shard_amount < 2 || !self.shard_amount.is_power_of_two() {
            return Err(ConfigError::InvalidShardAmount(self.shard_amount));
        }
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn shard_amount_must_be_power_of_two() {
        for bad in [0, 1, 3, 24] {
            let cfg = RegistryConfig { shard_amount: bad, ..RegistryConfig::default() };
            assert!(matches!(cfg.validate(), Err(ConfigError::InvalidShardAmount(n)) if n == bad));
        }
        let cfg = RegistryConfig { shard_amount: 64, ..RegistryConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn level_is_case_insensitive() {
        let cfg = LoggingConfig { level: "debug".into(), ..LoggingConfig::default() };
        assert!(cfg.validate().is_ok());
        let cfg = LoggingConfig { level: "loud".into(), ..LoggingConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidLevel(_))));
    }
}

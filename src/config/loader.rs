// src/config/loader.rs

//! # Configuration Loader
//!
//! Reads `default.toml`, deserializes it into `Config` and validates the
//! result before anything is built from it.

use crate::config::model::{Config, ConfigError};
use crate::netguard_log;
use log::Level;
use std::{fs, path::Path};

/// Load, parse and validate the configuration at `path`.
/// Logs at DEBUG before reading and INFO on success.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    netguard_log!(Level::Debug, "config", "Reading config from {:?}", path);
    let txt = fs::read_to_string(path)?;
    let cfg = from_str(&txt)?;
    netguard_log!(Level::Info, "config", "Loaded config from {:?}", path);
    Ok(cfg)
}

/// Parse and validate configuration from TOML text.
pub fn from_str(txt: &str) -> Result<Config, ConfigError> {
    let cfg: Config = toml::from_str(txt)?;
    cfg.validate()?;
    netguard_log!(
        Level::Debug,
        "config",
        "registry capacity={}, shards={}",
        cfg.registry.initial_capacity,
        cfg.registry.shard_amount
    );
    Ok(cfg)
}

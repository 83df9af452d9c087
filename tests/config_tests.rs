//! Configuration loading from TOML files.

use std::io::Write;

use netguard::config::{self, ConfigError};
use netguard::network::{IpProtocol, PacketInfo, Scope, UnknownAttributor};
use tempfile::NamedTempFile;

fn write_config(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn bundled_default_config_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/default.toml");
    let cfg = config::load(&path).unwrap();
    assert!(cfg.logging.enable);
    assert_eq!(cfg.logging.file.as_deref(), Some("netguard.log"));
    assert_eq!(cfg.registry.shard_amount, 32);
}

#[test]
fn missing_tables_use_defaults() {
    let file = write_config("[logging]\nlevel = \"debug\"\n");
    let cfg = config::load(file.path()).unwrap();
    assert_eq!(cfg.logging.level, "debug");
    assert!(!cfg.logging.enable);
    assert_eq!(cfg.registry.initial_capacity, 1_024);
}

#[test]
fn invalid_values_are_rejected() {
    let file = write_config("[registry]\nshard_amount = 3\n");
    assert!(matches!(config::load(file.path()), Err(ConfigError::InvalidShardAmount(3))));

    let file = write_config("[registry]\ninitial_capacity = 0\n");
    assert!(matches!(config::load(file.path()), Err(ConfigError::ZeroCapacity)));

    assert!(matches!(config::from_str("[logging]\nlevel = \"chatty\"\n"), Err(ConfigError::InvalidLevel(_))));
    assert!(matches!(config::from_str("[registry"), Err(ConfigError::Toml(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(config::load(&missing), Err(ConfigError::Io(_))));
}

#[test]
fn attributor_builds_from_loaded_config() {
    let cfg = config::from_str("[registry]\ninitial_capacity = 16\nshard_amount = 4\n").unwrap();
    let attributor = UnknownAttributor::from_config(&cfg.registry);

    let pkt = PacketInfo::outbound(
        IpProtocol::Tcp,
        "10.0.0.2".parse().unwrap(),
        40000,
        "172.20.0.1".parse().unwrap(),
        8080,
    );
    assert_eq!(attributor.attribute(&pkt).scope(), Scope::PeerLAN);
    assert_eq!(attributor.store().len(), 1);
}

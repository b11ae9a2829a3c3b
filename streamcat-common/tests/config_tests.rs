//! Unit tests for configuration loading and graceful degradation
//!
//! Tests that change XDG_CONFIG_HOME are marked #[serial] so they never observe each other's
//! environment.

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use streamcat_common::config::{
    load_or_default, load_toml_config, write_toml_config, ListenerConfig, TomlConfig,
};
use streamcat_common::SongRefPolicy;
use tempfile::TempDir;

#[test]
fn test_write_then_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = TomlConfig::default();
    config.data_dir = PathBuf::from("/srv/seed");
    config.graphql = ListenerConfig {
        port: Some(9001),
        enabled: false,
    };
    config.catalog.song_refs = SongRefPolicy::Validate;

    write_toml_config(&config, &path).unwrap();
    assert_eq!(load_toml_config(&path).unwrap(), config);
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let result = load_or_default(Some(&dir.path().join("absent.toml")));
    assert!(result.is_err());
}

#[test]
fn test_malformed_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "host = [").unwrap();
    assert!(load_or_default(Some(&path)).is_err());
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_no_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let config = load_or_default(None).unwrap();
    assert_eq!(config, TomlConfig::default());

    env::remove_var("XDG_CONFIG_HOME");
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_platform_config_file_is_found() {
    let dir = TempDir::new().unwrap();
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let path = dir.path().join("streamcat").join("config.toml");
    let mut config = TomlConfig::default();
    config.host = "0.0.0.0".to_string();
    write_toml_config(&config, &path).unwrap();

    let loaded = load_or_default(None).unwrap();
    assert_eq!(loaded.host, "0.0.0.0");

    env::remove_var("XDG_CONFIG_HOME");
}

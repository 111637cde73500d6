//! Integration tests for configuration management
//!
//! These tests load configuration files from disk and check the policy that
//! the gate will be built from.

use plugin_signature::Environment;
use plugingate_engine::config::Config;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_full_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[core]
env = "production"
log_level = "debug"

[plugins]
allow_loading_unsigned_plugins = ["acme-panel", "acme-datasource"]
"#,
    );

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.core.log_level, "debug");
    let policy = config.signature_policy();
    assert!(policy.is_allow_listed("acme-panel"));
    assert!(policy.is_allow_listed("acme-datasource"));
    assert!(!policy.is_allow_listed("acme-app"));
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "");

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.core.log_level, "info");
    assert!(config.plugins.allow_loading_unsigned_plugins.is_empty());
}

#[test]
fn test_development_env() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[core]
env = "development"
"#,
    );

    let config = Config::from_toml(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(config.core.env, Environment::Development);
    assert!(config.signature_policy().is_development());
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = Config::load_from_path(&temp_dir.path().join("missing.toml"));
    assert!(result.is_err());
}

#[test]
fn test_load_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[core\nenv = ");

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

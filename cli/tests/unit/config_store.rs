//! Tests for `YamlConfigStore` loading and validation.
//!
//! These tests mutate `APX_CONFIG` and are serialized with `serial_test`.

#![allow(clippy::expect_used, clippy::unwrap_used, unsafe_code)]

use std::path::{Path, PathBuf};

use apx_cli::domain::config::{ApxConfig, DEFAULT_APPEAR_TRIES};
use apx_cli::infra::config::{YamlConfigStore, resolve_root};
use serial_test::serial;
use tempfile::TempDir;

fn point_at(path: &Path) {
    // SAFETY: every test touching APX_CONFIG is #[serial].
    unsafe { std::env::set_var("APX_CONFIG", path) };
}

fn config_file(content: Option<&str>) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    if let Some(content) = content {
        std::fs::write(&path, content).expect("write config");
    }
    point_at(&path);
    (dir, path)
}

#[test]
#[serial]
fn test_load_missing_file_returns_defaults() {
    let (_dir, _) = config_file(None);

    let config = YamlConfigStore.load().unwrap();

    assert_eq!(config, ApxConfig::default());
}

#[test]
#[serial]
fn test_load_empty_file_returns_defaults() {
    let (_dir, _) = config_file(Some("\n"));

    assert_eq!(YamlConfigStore.load().unwrap(), ApxConfig::default());
}

#[test]
#[serial]
fn test_load_partial_file_fills_defaults() {
    let (_dir, _) = config_file(Some("seed_distro: Debian\nmount_workdir: false\n"));

    let config = YamlConfigStore.load().unwrap();

    assert_eq!(config.seed_distro, "Debian");
    assert!(!config.mount_workdir);
    assert_eq!(config.appear_tries, DEFAULT_APPEAR_TRIES);
}

#[test]
#[serial]
fn test_load_rejects_invalid_user() {
    let (_dir, _) = config_file(Some("default_user: \"Bad User\"\n"));

    let err = YamlConfigStore.load().unwrap_err();

    assert!(format!("{err:#}").contains("invalid config"), "{err:#}");
}

#[test]
#[serial]
fn test_load_rejects_malformed_yaml() {
    let (_dir, _) = config_file(Some("appear_tries: [not, a, number]\n"));

    let err = YamlConfigStore.load().unwrap_err();

    assert!(format!("{err:#}").contains("cannot parse"), "{err:#}");
}

#[test]
#[serial]
fn test_path_honours_env_override() {
    let (_dir, path) = config_file(None);

    assert_eq!(YamlConfigStore.path().unwrap(), path);
}

#[test]
fn test_resolve_root_prefers_override() {
    let config = ApxConfig {
        root_dir: Some(PathBuf::from("/srv/apx")),
        ..ApxConfig::default()
    };

    assert_eq!(resolve_root(&config).unwrap(), PathBuf::from("/srv/apx"));
}

//! End-to-end tests driving the `apx` binary.
//!
//! Every test points `APX_CONFIG` at a temp file so nothing reads or writes
//! the real local data directory. Tests that need a working `wsl` use a
//! shell-script stand-in configured through `wsl_exe`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn apx() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("apx"));
    cmd.env("NO_COLOR", "1").env_remove("APX_LOG").env_remove("RUST_LOG");
    cmd
}

/// A temp dir holding `config.yaml` with `extra` appended to a `root_dir`
/// pointing inside the same dir.
fn temp_config(extra: &str) -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().join("root");
    let path = dir.path().join("config.yaml");
    let content = format!("root_dir: '{}'\n{extra}", root.display());
    std::fs::write(&path, content).expect("write config");
    (dir, path.to_string_lossy().into_owned())
}

#[cfg(unix)]
fn fake_wsl(dir: &Path, distros: &[&str]) -> String {
    use std::os::unix::fs::PermissionsExt;

    let listing = distros
        .iter()
        .map(|d| format!("printf '%s\\r\\n' '{d}'"))
        .collect::<Vec<_>>()
        .join("\n");
    let script = format!(
        "#!/bin/sh\ncase \"$1\" in\n  -l) \n{listing}\n    exit 0 ;;\n  *) exit 1 ;;\nesac\n"
    );
    let path = dir.join("fake-wsl");
    std::fs::write(&path, script).expect("write fake wsl");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path.to_string_lossy().into_owned()
}

// ---------------------------------------------------------------------------
// Usage handling
// ---------------------------------------------------------------------------

#[test]
fn test_help_lists_commands() {
    apx()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("enter"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_names_binary() {
    apx()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("apx"));
}

#[test]
fn test_no_arguments_prints_usage_and_exits_zero() {
    apx()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_verb_prints_usage_and_exits_zero() {
    apx()
        .arg("frobnicate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_create_without_name_prints_usage_and_exits_zero() {
    apx()
        .arg("create")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_create_help_shows_install_dir_flag() {
    apx()
        .args(["create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--installDir"));
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_invalid_config_exits_one() {
    let (_dir, path) = temp_config("default_user: \"Bad User\"\n");
    apx()
        .arg("list")
        .env("APX_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_invalid_config_in_json_mode_reports_config_error() {
    let (_dir, path) = temp_config("appear_tries: 0\n");
    let output = apx()
        .args(["--json", "list"])
        .env("APX_CONFIG", &path)
        .output()
        .expect("run apx");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().last().expect("one JSON line");
    let value: serde_json::Value = serde_json::from_str(line).expect("valid JSON");
    assert_eq!(value["error"]["kind"], "config");
}

// ---------------------------------------------------------------------------
// `apx list`
// ---------------------------------------------------------------------------

#[test]
fn test_list_with_missing_wsl_fails() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("no-such-wsl");
    let (_cfg_dir, path) = temp_config(&format!("wsl_exe: '{}'\n", missing.display()));
    apx()
        .arg("list")
        .env("APX_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[cfg(unix)]
#[test]
fn test_list_prints_distros_from_wsl() {
    let dir = TempDir::new().expect("temp dir");
    let wsl = fake_wsl(dir.path(), &["Ubuntu", "dev"]);
    let (_cfg_dir, path) = temp_config(&format!("wsl_exe: '{wsl}'\n"));
    apx()
        .arg("list")
        .env("APX_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("WSL distros (VHD path):"))
        .stdout(predicate::str::contains("Ubuntu"))
        .stdout(predicate::str::contains("dev"));
}

#[cfg(unix)]
#[test]
fn test_list_with_no_distros_reports_empty() {
    let dir = TempDir::new().expect("temp dir");
    let wsl = fake_wsl(dir.path(), &[]);
    let (_cfg_dir, path) = temp_config(&format!("wsl_exe: '{wsl}'\n"));
    apx()
        .arg("list")
        .env("APX_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No WSL distros found."));
}

#[cfg(unix)]
#[test]
fn test_list_json_emits_events_then_result() {
    let dir = TempDir::new().expect("temp dir");
    let wsl = fake_wsl(dir.path(), &["Ubuntu"]);
    let (_cfg_dir, path) = temp_config(&format!("wsl_exe: '{wsl}'\n"));
    let output = apx()
        .args(["--json", "list"])
        .env("APX_CONFIG", &path)
        .output()
        .expect("run apx");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect();
    let (result, events) = lines.split_last().expect("at least a result line");
    assert!(events.iter().all(|e| e["type"] == "event"));
    assert!(events.iter().any(|e| e["message"] == "Ubuntu"));
    assert_eq!(result["type"], "result");
    assert_eq!(result["command"], "list");
    assert_eq!(result["success"], true);
}

#[cfg(unix)]
#[test]
fn test_no_color_env_does_not_block_commands() {
    let dir = TempDir::new().expect("temp dir");
    let wsl = fake_wsl(dir.path(), &["Ubuntu"]);
    let (_cfg_dir, path) = temp_config(&format!("wsl_exe: '{wsl}'\n"));
    for value in ["1", "true", "yes"] {
        apx()
            .arg("list")
            .env("NO_COLOR", value)
            .env("APX_CONFIG", &path)
            .assert()
            .success()
            .stdout(predicate::str::contains("WSL distros (VHD path):"))
            .stdout(predicate::str::contains("Usage").not());
    }
}

#[test]
fn test_no_color_env_with_missing_wsl_reports_error() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("no-such-wsl");
    let (_cfg_dir, path) = temp_config(&format!("wsl_exe: '{}'\n", missing.display()));
    apx()
        .arg("list")
        .env("NO_COLOR", "1")
        .env("APX_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("invalid value").not());
}

#[cfg(unix)]
#[test]
fn test_quiet_list_prints_nothing_on_success() {
    let dir = TempDir::new().expect("temp dir");
    let wsl = fake_wsl(dir.path(), &["Ubuntu"]);
    let (_cfg_dir, path) = temp_config(&format!("wsl_exe: '{wsl}'\n"));
    apx()
        .args(["--quiet", "list"])
        .env("APX_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ---------------------------------------------------------------------------
// `apx delete`
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn test_delete_missing_distro_fails_with_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let wsl = fake_wsl(dir.path(), &["Ubuntu"]);
    let (_cfg_dir, path) = temp_config(&format!("wsl_exe: '{wsl}'\n"));
    let output = apx()
        .args(["--json", "--yes", "delete", "ghost"])
        .env("APX_CONFIG", &path)
        .output()
        .expect("run apx");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value =
        serde_json::from_str(stdout.lines().last().expect("result line")).expect("JSON");
    assert_eq!(result["success"], false);
    assert_eq!(result["error"]["kind"], "not_found");
}

//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// savectl with HOME and the working directory isolated in a temp dir
fn savectl(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("savectl").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("SAVECTL_USER")
        .env_remove("SAVECTL_ENDPOINT")
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG")
        .current_dir(home.path());
    cmd
}

// === Help ===

#[test]
fn test_top_level_help_lists_commands() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tap"))
        .stdout(predicate::str::contains("sheet"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_tap_help() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .args(["tap", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restaurant name"));
}

#[test]
fn test_sheet_help() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .args(["sheet", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repeatable"));
}

#[test]
fn test_serve_help() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--memory"));
}

#[test]
fn test_boards_create_help() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .args(["boards", "create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1-64 characters"));
}

// === Argument validation ===

#[test]
fn test_state_requires_user() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .args(["state", "6f1c3f4e-3a0b-4f57-9a3e-2d5d8f1b7c11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User required"));
}

#[test]
fn test_tap_without_current_state_prints_no_optimistic_icon() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .args([
            "--endpoint",
            "http://127.0.0.1:9",
            "--user",
            "2c4a9d0e-8f1b-4c3d-9e7a-5b6c7d8e9f01",
            "tap",
            "6f1c3f4e-3a0b-4f57-9a3e-2d5d8f1b7c11",
            "--name",
            "Tartine",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("could not load current state"));
}

#[test]
fn test_malformed_restaurant_id_is_rejected() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .args(["state", "not-a-uuid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid UUID format"));
}

// === Config ===

#[test]
fn test_config_path_under_home() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".savectl/config.toml"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let home = TempDir::new().unwrap();

    savectl(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join(".savectl/config.toml").exists());

    savectl(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    savectl(&home)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_applies_env() {
    let home = TempDir::new().unwrap();
    savectl(&home)
        .env("SAVECTL_ENDPOINT", "http://localhost:9999")
        .args(["config", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:9999"));
}

// ABOUTME: Integration tests for the keelson CLI commands.
// ABOUTME: Validates --help output, init behavior and config errors.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn keelson_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("keelson"))
}

#[test]
fn help_shows_commands() {
    keelson_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("dev"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("keelson.yml");

    keelson_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--image", "ghcr.io/org/shop"])
        .assert()
        .success();

    assert!(config_path.exists(), "keelson.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("image: ghcr.io/org/shop"));
    assert!(content.contains("tag_policy: sha256"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("keelson.yml"), "artifacts: []").unwrap();

    keelson_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn run_without_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    keelson_cmd()
        .current_dir(temp_dir.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn dev_with_unresolvable_config_fails_before_building() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("keelson.yml"),
        "artifacts:\n  - image: web\nbuild:\n  tag_policy: sha256\n",
    )
    .unwrap();

    keelson_cmd()
        .current_dir(temp_dir.path())
        .arg("dev")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no build strategy"));
}

#[test]
fn quiet_and_json_conflict() {
    keelson_cmd()
        .args(["--quiet", "--json", "run"])
        .assert()
        .failure();
}

//! Binary-level tests for the tapwatch CLI.

mod common;

use assert_cmd::Command;
use common::StaticServer;
use predicates::prelude::*;
use tempfile::TempDir;

fn tapwatch() -> Command {
    let mut cmd = Command::cargo_bin("tapwatch").unwrap();
    cmd.env_remove("TAPWATCH_UPSTREAM_URL")
        .env_remove("TAPWATCH_VERSION_FILE")
        .env_remove("TAPWATCH_STAGING_DIR")
        .env_remove("TAPWATCH_TAP_PATH")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    tapwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_run_with_missing_record_fails_before_network() {
    let dir = TempDir::new().unwrap();

    tapwatch()
        .args([
            "--quiet",
            "run",
            "--upstream-url",
            // Unreachable on purpose; the store failure must come first
            "http://127.0.0.1:1/",
            "--version-file",
            dir.path().join("absent.yml").to_str().unwrap(),
            "--staging-dir",
            dir.path().to_str().unwrap(),
            "--tap-path",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Version record not found"));
}

#[test]
fn test_run_with_malformed_record_fails_before_network() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("version.yml");
    std::fs::write(&record, "no version key here\n").unwrap();

    tapwatch()
        .args([
            "--quiet",
            "run",
            "--upstream-url",
            "http://127.0.0.1:1/",
            "--version-file",
            record.to_str().unwrap(),
            "--staging-dir",
            dir.path().to_str().unwrap(),
            "--tap-path",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version record"));
}

#[test]
fn test_unreachable_upstream_is_a_discovery_failure() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("version.yml");
    common::write_version_record(&record, "2.21.1");

    tapwatch()
        .args([
            "--quiet",
            "check",
            "--upstream-url",
            "http://127.0.0.1:1/",
            "--version-file",
            record.to_str().unwrap(),
            "--staging-dir",
            dir.path().to_str().unwrap(),
            "--tap-path",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch upstream page"));
}

#[test]
fn test_check_reports_available_update() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("version.yml");
    common::write_version_record(&record, "2.21.1");

    let server = StaticServer::start(vec![("/".to_string(), common::landing_page("2.21.2"))]);

    tapwatch()
        .args([
            "--quiet",
            "check",
            "--upstream-url",
            &server.url("/"),
            "--version-file",
            record.to_str().unwrap(),
            "--staging-dir",
            dir.path().to_str().unwrap(),
            "--tap-path",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Update available"))
        .stdout(predicate::str::contains("2.21.1 -> 2.21.2"));
}

#[test]
fn test_check_reports_up_to_date() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("version.yml");
    common::write_version_record(&record, "2.21.2");

    let server = StaticServer::start(vec![("/".to_string(), common::landing_page("2.21.2"))]);

    tapwatch()
        .args([
            "--quiet",
            "check",
            "--upstream-url",
            &server.url("/"),
            "--version-file",
            record.to_str().unwrap(),
            "--staging-dir",
            dir.path().to_str().unwrap(),
            "--tap-path",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Up to date (2.21.2)"));
}

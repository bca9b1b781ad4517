//! Binary smoke tests
//!
//! Drives the compiled `mentora` binary over a temporary data directory:
//! help output, key management, and the stats report.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn mentora(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mentora").expect("binary builds");
    cmd.env("MENTORA_DATA_DIR", data_dir);
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let dir = tempdir().expect("tempdir");
    mentora(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("notes"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("sessions"));
}

#[test]
fn test_key_set_show_clear_roundtrip() {
    let dir = tempdir().expect("tempdir");

    mentora(dir.path())
        .args(["key", "set", "sk-abcdef"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API key stored."));

    mentora(dir.path())
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-a*****"));

    mentora(dir.path())
        .args(["key", "clear"])
        .assert()
        .success();

    mentora(dir.path())
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No API key configured."));
}

#[test]
fn test_key_set_rejects_blank() {
    let dir = tempdir().expect("tempdir");
    mentora(dir.path())
        .args(["key", "set", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("blank"));
}

#[test]
fn test_stats_json_on_fresh_store() {
    let dir = tempdir().expect("tempdir");
    mentora(dir.path())
        .args(["stats", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_sessions\": 0"))
        .stdout(predicate::str::contains("\"streak_days\": 0"));
}

#[test]
fn test_sessions_on_fresh_store() {
    let dir = tempdir().expect("tempdir");
    mentora(dir.path())
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains("No closed sessions yet."));
}

//! Smoke tests for the dailykit binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("dailykit").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help_shows_env_fallbacks() {
    let mut cmd = Command::cargo_bin("dailykit").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PORT"))
        .stdout(predicate::str::contains("DATABASE_URL"))
        .stdout(predicate::str::contains("--cors-permissive"));
}

#[test]
fn test_invalid_port_is_rejected() {
    let mut cmd = Command::cargo_bin("dailykit").unwrap();
    cmd.arg("serve").arg("--port").arg("not-a-port");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_migrate_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("smoke.db");
    let url = format!("sqlite://{}", db_path.display());

    // Twice: the schema is idempotent
    for _ in 0..2 {
        let mut cmd = Command::cargo_bin("dailykit").unwrap();
        cmd.current_dir(dir.path())
            .env_remove("RUST_LOG")
            .arg("migrate")
            .arg("--database-url")
            .arg(&url);

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Schema up to date"));
    }

    assert!(db_path.exists());
}

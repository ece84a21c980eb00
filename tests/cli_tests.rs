//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

fn pitchcast() -> Command {
    Command::cargo_bin("pitchcast").expect("binary built")
}

#[test]
fn help_output() {
    pitchcast()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--camera"))
        .stdout(predicate::str::contains("--microphone"))
        .stdout(predicate::str::contains("--max-duration"))
        .stdout(predicate::str::contains("--countdown"))
        .stdout(predicate::str::contains("--provider"))
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    pitchcast()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pitchcast"));
}

#[test]
fn config_help() {
    pitchcast()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn config_path_command() {
    pitchcast()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pitchcast"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn devices_help() {
    pitchcast()
        .args(["devices", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("select"));
}

#[test]
fn invalid_max_duration_error() {
    pitchcast()
        .args(["--max-duration", "soon"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn invalid_provider_is_rejected() {
    pitchcast()
        .args(["--provider", "gemini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn analyze_requires_api_base() {
    // No configured API base and none in the environment
    pitchcast()
        .env_remove("PITCHCAST_API_BASE")
        .env("XDG_CONFIG_HOME", tempfile::tempdir().unwrap().path())
        .env("HOME", tempfile::tempdir().unwrap().path())
        .args(["analyze", "take.wav"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Missing API base URL"));
}

#[test]
fn analyze_missing_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nothing.wav");

    pitchcast()
        .env("PITCHCAST_API_BASE", "http://127.0.0.1:1")
        .arg("analyze")
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();

    pitchcast()
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .args(["config", "set", "resolution", "1080p"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_and_get_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    pitchcast()
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .args(["config", "set", "provider", "deepgram"])
        .assert()
        .success();

    pitchcast()
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .args(["config", "get", "provider"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deepgram"));
}

// CLI surface smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn scanctl() -> Command {
    let mut cmd = Command::cargo_bin("scanctl").expect("binary");
    // Keep host configuration out of the tests.
    cmd.env("SCANCTL_PROFILE", "test-does-not-exist");
    cmd.env_remove("SCANCTL_GATEWAY");
    cmd.env_remove("SCANCTL_USERNAME");
    cmd.env_remove("SCANCTL_PASSWORD");
    cmd
}

#[test]
fn help_lists_entity_commands() {
    scanctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks"))
        .stdout(predicate::str::contains("reports"))
        .stdout(predicate::str::contains("scanners"))
        .stdout(predicate::str::contains("credentials"));
}

#[test]
fn no_args_shows_usage() {
    scanctl()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_gateway_fails_before_any_network_use() {
    scanctl()
        .args(["tasks", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn config_path_prints_a_path() {
    scanctl()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn completions_generate_for_bash() {
    scanctl()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scanctl"));
}

#[test]
fn report_get_rejects_conflicting_flags() {
    scanctl()
        .args(["reports", "get", "r1", "--details", "--summary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

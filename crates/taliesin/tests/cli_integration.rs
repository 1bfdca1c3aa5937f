//! CLI integration tests for the Taliesin command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Missing configuration is rejected with a useful message
//!
//! Note: These tests never reach the network - they exercise parsing,
//! help output, and configuration errors only.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the taliesin binary.
fn taliesin() -> Command {
    Command::cargo_bin("taliesin").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    taliesin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Taliesin"))
        .stdout(predicate::str::contains("Deep-Research"));
}

#[test]
fn test_version_displays() {
    taliesin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taliesin"));
}

#[test]
fn test_help_lists_subcommands() {
    taliesin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("research"))
        .stdout(predicate::str::contains("check"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Flag Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_verbose_flag_accepted() {
    taliesin().args(["--verbose", "--help"]).assert().success();
}

#[test]
fn test_json_flag_accepted() {
    taliesin().args(["--json", "--help"]).assert().success();
}

// ─────────────────────────────────────────────────────────────────────────────
// Subcommand Help Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_research_help() {
    taliesin()
        .args(["research", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("topic"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--reports-dir"))
        .stdout(predicate::str::contains("--no-clarify"));
}

#[test]
fn test_check_help() {
    taliesin()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration"))
        .stdout(predicate::str::contains("--ping"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Invalid Input Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_subcommand_fails() {
    taliesin()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_invalid_flag_fails() {
    taliesin()
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_research_requires_a_topic() {
    taliesin()
        .arg("research")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_research_without_openai_key_fails() {
    taliesin()
        .env_remove("OPENAI_API_KEY")
        .args(["research", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_research_without_exa_key_fails() {
    taliesin()
        .env("OPENAI_API_KEY", "test-key")
        .env_remove("EXA_API_KEY")
        .args(["research", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("EXA_API_KEY"));
}

#[test]
fn test_check_reports_missing_keys_without_failing() {
    taliesin()
        .env_remove("OPENAI_API_KEY")
        .env_remove("EXA_API_KEY")
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("OPENAI_API_KEY not set"))
        .stdout(predicate::str::contains("EXA_API_KEY not set"));
}

#[test]
fn test_check_json_output() {
    taliesin()
        .env_remove("OPENAI_API_KEY")
        .env_remove("EXA_API_KEY")
        .args(["check", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"openai\""))
        .stdout(predicate::str::contains("\"exa\""));
}

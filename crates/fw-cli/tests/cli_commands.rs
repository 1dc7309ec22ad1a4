//! Integration tests for the `fw` CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A temp directory and the path of a state file inside it.
fn state_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    (dir, path)
}

/// A state file recording an EOD detonation.
fn frozen_state() -> (TempDir, PathBuf) {
    let (dir, path) = state_dir();
    fs::write(
        &path,
        r#"{
  "fw_eod_detonated_timestamp": "1700000000000"
}"#,
    )
    .unwrap();
    (dir, path)
}

fn fw(state: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fw").unwrap();
    cmd.env("NO_COLOR", "1").arg("--state").arg(state);
    cmd
}

// ---------------------------------------------------------------------------
// series
// ---------------------------------------------------------------------------

#[test]
fn series_lists_catalog() {
    let (_dir, state) = state_dir();
    fw(&state)
        .arg("series")
        .assert()
        .success()
        .stdout(predicate::str::contains("M1-T 'Tutor'"))
        .stdout(predicate::str::contains("M4-S 'Scorpion'"))
        .stdout(predicate::str::contains("M7-B 'Spectre'"))
        .stdout(predicate::str::contains("3 series"));
}

#[test]
fn series_json() {
    let (_dir, state) = state_dir();
    let output = fw(&state).args(["series", "--json"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"base_time_secs\": 240"));
    assert!(stdout.contains("\"id\": \"M7-B\""));
}

// ---------------------------------------------------------------------------
// eod
// ---------------------------------------------------------------------------

#[test]
fn eod_arms_and_quits() {
    let (_dir, state) = state_dir();
    fw(&state)
        .args(["--seed", "1", "eod", "M1-T", "--roll", "30"])
        .write_stdin("status\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("M1-T 'Tutor'"))
        .stdout(predicate::str::contains("SUCCESS (30)"))
        .stdout(predicate::str::contains("[WIRES]"))
        .stdout(predicate::str::contains("walk away from the device"));
}

#[test]
fn eod_manual_lists_modules() {
    let (_dir, state) = state_dir();
    fw(&state)
        .args(["--seed", "3", "eod", "M4-S", "--roll", "30"])
        .write_stdin("manual\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("== WIRES =="))
        .stdout(predicate::str::contains("== KEYPAD (4 DIGITS) =="));
}

#[test]
fn eod_unknown_series_fails() {
    let (_dir, state) = state_dir();
    fw(&state)
        .args(["eod", "X9"])
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown device series"));
}

#[test]
fn eod_invalid_roll_fails() {
    let (_dir, state) = state_dir();
    fw(&state)
        .args(["eod", "M1-T", "--roll", "0"])
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid d100 roll"));
}

#[test]
fn fumbled_mistake_detonates_and_freezes() {
    let (_dir, state) = state_dir();
    fw(&state)
        .args(["--seed", "5", "eod", "M4-S", "--roll", "99"])
        .write_stdin("submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("FUMBLE (99)"))
        .stdout(predicate::str::contains("DEVICE DETONATED"));

    let saved = fs::read_to_string(&state).unwrap();
    assert!(saved.contains("fw_eod_detonated_timestamp"));

    fw(&state)
        .args(["eod", "M1-T"])
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("frozen"));
}

#[test]
fn eod_refuses_frozen_terminal() {
    let (_dir, state) = frozen_state();
    fw(&state)
        .args(["eod", "M1-T"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fw reset --game eod"));
}

// ---------------------------------------------------------------------------
// reset / lock
// ---------------------------------------------------------------------------

#[test]
fn reset_clear_terminal() {
    let (_dir, state) = state_dir();
    fw(&state)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("EOD range reset"));
}

#[test]
fn reset_frozen_without_code_fails() {
    let (_dir, state) = frozen_state();
    fw(&state)
        .arg("reset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("override code required"));
}

#[test]
fn reset_with_override_code() {
    let (_dir, state) = frozen_state();
    fw(&state)
        .args(["reset", "--code", "1711"])
        .assert()
        .success();

    let saved = fs::read_to_string(&state).unwrap();
    assert!(!saved.contains("fw_eod_detonated_timestamp"));

    fw(&state)
        .args(["--seed", "2", "eod", "M1-T", "--roll", "30"])
        .write_stdin("quit\n")
        .assert()
        .success();
}

#[test]
fn wrong_codes_escalate_to_hard_lock() {
    let (_dir, state) = frozen_state();
    fw(&state)
        .args(["reset", "--code", "0000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 attempt(s) remaining"));
    fw(&state)
        .args(["reset", "--code", "0000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("locked for 05:00"));

    fw(&state)
        .args(["reset", "--code", "1711"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("terminal locked"));
    fw(&state)
        .args(["eod", "M1-T"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("terminal locked"));
}

#[test]
fn lock_shows_both_terminals() {
    let (_dir, state) = frozen_state();
    fw(&state)
        .arg("lock")
        .assert()
        .success()
        .stdout(predicate::str::contains("EOD range"))
        .stdout(predicate::str::contains("frozen (2 override attempt(s) remaining)"))
        .stdout(predicate::str::contains("Network intrusion"))
        .stdout(predicate::str::contains("ready"))
        .stdout(predicate::str::contains("practice mode: off"));
}

#[test]
fn reset_net_is_independent() {
    let (_dir, state) = frozen_state();
    fw(&state)
        .args(["reset", "--game", "net"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Intrusion terminal reset"));
    let saved = fs::read_to_string(&state).unwrap();
    assert!(saved.contains("fw_eod_detonated_timestamp"));
}

#[test]
fn reset_tolerates_non_string_values() {
    let (_dir, state) = state_dir();
    fs::write(
        &state,
        r#"{"fw_eod_detonated_timestamp":"1700000000000","fw_eod_lock_tries":1}"#,
    )
    .unwrap();
    fw(&state)
        .args(["reset", "--code", "1711"])
        .assert()
        .success()
        .stdout(predicate::str::contains("EOD range reset"));
    let saved = fs::read_to_string(&state).unwrap();
    assert!(!saved.contains("fw_eod_detonated_timestamp"));
}

#[test]
fn truncated_state_file_does_not_block_recovery() {
    let (_dir, state) = state_dir();
    fs::write(&state, r#"{"fw_eod_detonated_timestamp": "17000"#).unwrap();
    fw(&state)
        .args(["reset", "--code", "1711"])
        .assert()
        .success();
    fw(&state).args(["practice", "on"]).assert().success();

    let saved = fs::read_to_string(&state).unwrap();
    assert!(saved.contains("fw_practice_mode"));
    fw(&state)
        .arg("practice")
        .assert()
        .success()
        .stdout(predicate::str::contains("practice mode: on"));
}

// ---------------------------------------------------------------------------
// practice
// ---------------------------------------------------------------------------

#[test]
fn practice_mode_clears_lockouts() {
    let (_dir, state) = frozen_state();
    fw(&state)
        .args(["practice", "on"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Practice mode on"));
    fw(&state)
        .arg("practice")
        .assert()
        .success()
        .stdout(predicate::str::contains("practice mode: on"));

    fw(&state)
        .args(["--seed", "4", "eod", "M1-T", "--roll", "30"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Arming"));

    fw(&state).args(["practice", "off"]).assert().success();
    fw(&state)
        .arg("practice")
        .assert()
        .success()
        .stdout(predicate::str::contains("practice mode: off"));
}

// ---------------------------------------------------------------------------
// intrusion
// ---------------------------------------------------------------------------

#[test]
fn intrusion_connects_and_quits() {
    let (_dir, state) = state_dir();
    fw(&state)
        .args(["--seed", "1", "intrusion", "-d", "easy", "--roll", "30"])
        .write_stdin("capture 1 0\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("easy network (5x5)"))
        .stdout(predicate::str::contains("SUCCESS (30)"))
        .stdout(predicate::str::contains("(1, 0) captured"))
        .stdout(predicate::str::contains("TRACE ["))
        .stdout(predicate::str::contains("Connection dropped"));
}

#[test]
fn intrusion_unknown_difficulty_fails() {
    let (_dir, state) = state_dir();
    fw(&state)
        .args(["intrusion", "-d", "insane"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown difficulty"));
}

#[test]
fn intrusion_refuses_frozen_terminal() {
    let (_dir, state) = state_dir();
    fs::write(&state, r#"{"fw_net_detonated_timestamp": "1700000000000"}"#).unwrap();
    fw(&state)
        .args(["intrusion"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fw reset --game net"));
}

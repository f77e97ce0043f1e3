//! End-to-end tests for the consigna CLI
//!
//! Each test runs the real binary in a temporary directory, walking a
//! ticket through the same flow an operator would: init, register a
//! branch, check in, look up, check out.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn consigna(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("consigna").expect("binary builds");
    cmd.current_dir(dir.path());
    cmd
}

fn init_with_branch(dir: &TempDir) {
    consigna(dir).arg("init").assert().success();
    consigna(dir)
        .args(["branch", "add", "centro", "Sucursal Centro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("centro"));
}

/// Check one item in and return its token, parsed from the JSON output
fn check_in(dir: &TempDir) -> String {
    let output = consigna(dir)
        .args([
            "check-in",
            "--branch",
            "centro",
            "--item-type",
            "MOCHILA",
            "--quantity",
            "1",
            "--json",
        ])
        .output()
        .expect("check-in runs");
    assert!(output.status.success(), "check-in failed: {output:?}");

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("check-in emits JSON");
    value["token"].as_str().expect("token present").to_string()
}

#[test]
fn commands_require_initialized_storage() {
    let dir = TempDir::new().unwrap();
    consigna(&dir)
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn full_check_in_check_out_flow() {
    let dir = TempDir::new().unwrap();
    init_with_branch(&dir);

    let token = check_in(&dir);
    assert_eq!(token.len(), 8);

    // Lookup tolerates case and whitespace
    let messy = format!("  {} ", token.to_lowercase());
    consigna(&dir)
        .args(["show", &messy])
        .assert()
        .success()
        .stdout(predicate::str::contains(&token))
        .stdout(predicate::str::contains("ACTIVE"));

    // Minimum billing applies right away: 8/h MOCHILA, min 1 hour
    consigna(&dir)
        .args(["check-out", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 h billed"))
        .stdout(predicate::str::contains("8.00"));

    // The ticket is now closed and the charge is frozen
    consigna(&dir)
        .args(["show", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("CLOSED"))
        .stdout(predicate::str::contains("Final charge"));
}

#[test]
fn second_check_out_reports_already_closed() {
    let dir = TempDir::new().unwrap();
    init_with_branch(&dir);
    let token = check_in(&dir);

    consigna(&dir).args(["check-out", &token]).assert().success();
    consigna(&dir)
        .args(["check-out", &token])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already closed"));
}

#[test]
fn zero_quantity_check_in_is_rejected() {
    let dir = TempDir::new().unwrap();
    init_with_branch(&dir);

    consigna(&dir)
        .args([
            "check-in",
            "--branch",
            "centro",
            "--item-type",
            "MALETA",
            "--quantity",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid quantity"));

    // Nothing was persisted
    consigna(&dir)
        .args(["list", "--status", "ACTIVE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No ACTIVE tickets"));
}

#[test]
fn check_in_against_unknown_branch_is_rejected() {
    let dir = TempDir::new().unwrap();
    consigna(&dir).arg("init").assert().success();

    consigna(&dir)
        .args([
            "check-in",
            "--branch",
            "nowhere",
            "--item-type",
            "BOLSA",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("inactive or unknown"));
}

#[test]
fn listing_accepts_status_synonyms() {
    let dir = TempDir::new().unwrap();
    init_with_branch(&dir);
    let token = check_in(&dir);
    consigna(&dir).args(["check-out", &token]).assert().success();

    // "ENTREGADO" is accepted at the boundary and maps to CLOSED
    consigna(&dir)
        .args(["list", "--status", "entregado"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&token));
}

#[test]
fn pricing_set_changes_the_live_charge() {
    let dir = TempDir::new().unwrap();
    init_with_branch(&dir);

    consigna(&dir)
        .args(["pricing", "set", "--rate", "MOCHILA=20", "--rounding", "CEIL"])
        .assert()
        .success();
    consigna(&dir)
        .args(["pricing", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20.00/h"));

    let token = check_in(&dir);
    consigna(&dir)
        .args(["check-out", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("20.00"));
}

#[test]
fn malformed_tokens_are_rejected_before_lookup() {
    let dir = TempDir::new().unwrap();
    init_with_branch(&dir);

    consigna(&dir)
        .args(["show", "ab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed token"));

    // Well-formed but unknown token is a distinct outcome
    consigna(&dir)
        .args(["show", "ZZZZ9999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No ticket found"));
}

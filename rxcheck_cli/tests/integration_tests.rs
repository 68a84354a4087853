//! Integration tests for the rxcheck binary.
//!
//! These tests verify end-to-end behavior including:
//! - Interaction and overdose reports
//! - Unknown-name warnings and error exits
//! - JSON and CSV output
//! - Config file handling

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create an isolated config home
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from the user's config and RUST_LOG
fn cli(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rxcheck"));
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("Failed to write config");
    path
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Drug interaction and overdose-risk reference",
        ))
        .stdout(predicate::str::contains("interact"))
        .stdout(predicate::str::contains("overdose"));
}

#[test]
fn test_interact_opioid_benzo_is_extreme() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["interact", "fentanyl", "xanax"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Analyzing combination of: fentanyl + xanax"))
        .stdout(predicate::str::contains("Respiratory Depression"))
        .stdout(predicate::str::contains("Severity: LETHAL"))
        .stdout(predicate::str::contains("EXTREME DANGER"));
}

#[test]
fn test_interact_warns_about_unknown_names() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["interact", "fentanyl", "bogus", "xanax"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: Substance 'bogus' not found."))
        .stdout(predicate::str::contains("fentanyl + xanax"));
}

#[test]
fn test_interact_needs_two_known_substances() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["interact", "fentanyl", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Warning: Substance 'bogus' not found."))
        .stderr(predicate::str::contains("Error: at least 2 recognised substance(s)"));
}

#[test]
fn test_interact_without_matrix_entry() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["interact", "lsd", "psilocybin"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No specific dangerous interactions found in database.",
        ));
}

#[test]
fn test_overdose_single_substance() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["overdose", "fentanyl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overdose Risk Percentage: 95%"))
        .stdout(predicate::str::contains("Extremely High Risk"))
        .stdout(predicate::str::contains("CRITICAL WARNING"));
}

#[test]
fn test_overdose_speedball_combination() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["overdose", "cocaine", "heroin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cocaine: 58% risk"))
        .stdout(predicate::str::contains("heroin: 85% risk"))
        .stdout(predicate::str::contains("Combined Overdose Risk: 100%"))
        .stdout(predicate::str::contains("DANGEROUS SPEEDBALL COMBINATION!"));
}

#[test]
fn test_overdose_accepts_risk_table_only_names() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["overdose", "thc", "cbd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Combined Overdose Risk: 33%"));
}

#[test]
fn test_overdose_with_no_known_names_fails() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["overdose", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_overdose_json_output() {
    let temp_dir = setup_test_dir();
    let output = cli(&temp_dir)
        .args(["--output", "json", "overdose", "lsd", "psilocybin"])
        .output()
        .expect("Failed to run");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["substances"], serde_json::json!(["lsd", "psilocybin"]));
    assert_eq!(json["assessment"]["kind"], "combination");
    assert_eq!(json["assessment"]["breakdown"]["percentage"], 56);
    assert_eq!(json["assessment"]["breakdown"]["speedball"], false);
}

#[test]
fn test_interact_json_output() {
    let temp_dir = setup_test_dir();
    let output = cli(&temp_dir)
        .args(["interact", "fentanyl", "xanax", "-o", "json"])
        .output()
        .expect("Failed to run");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["assessment"], "extreme");
    assert_eq!(json["effects"][0]["severity"], "lethal");
}

#[test]
fn test_info_resolves_alias() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["info", "xanax"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== alprazolam ==="))
        .stdout(predicate::str::contains("Class: benzodiazepine"))
        .stdout(predicate::str::contains("Overdose Risk: 72%"));
}

#[test]
fn test_info_unknown_substance_fails() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["info", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_list_by_class() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["list", "--class", "depressant"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phenobarbital"))
        .stdout(predicate::str::contains("secobarbital"))
        .stdout(predicate::str::contains("Total substances: 2"));
}

#[test]
fn test_list_unknown_class_fails() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["list", "--class", "nootropic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown substance class"));
}

#[test]
fn test_list_csv_output() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["list", "--output", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "id,class,half_life_hours,onset_hours,peak_hours,respiratory_depression,masks_other_drugs,risk_percentage",
        ))
        .stdout(predicate::str::contains("fentanyl,opioid,"));
}

#[test]
fn test_csv_rejected_for_reports() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["--output", "csv", "interact", "fentanyl", "xanax"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("csv output is not available"));
}

#[test]
fn test_search_is_case_insensitive() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["search", "FENT"])
        .assert()
        .success()
        .stdout("carfentanil\nfentanyl\n");
}

#[test]
fn test_risks_single_category() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["risks", "--category", "extremely-high"])
        .assert()
        .success()
        .stdout(predicate::str::contains("carfentanil"))
        .stdout(predicate::str::contains("fentanyl"))
        .stdout(predicate::str::contains("heroin").not());
}

#[test]
fn test_config_custom_risk() {
    let temp_dir = setup_test_dir();
    let config = write_config(&temp_dir, "[risk]\ncustom = { kratom = 30 }\n");

    cli(&temp_dir)
        .arg("--config")
        .arg(&config)
        .args(["overdose", "kratom"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overdose Risk Percentage: 30%"));
}

#[test]
fn test_config_sets_default_output_format() {
    let temp_dir = setup_test_dir();
    let config = write_config(&temp_dir, "[output]\nformat = \"json\"\n");

    let output = cli(&temp_dir)
        .arg("--config")
        .arg(&config)
        .args(["search", "heroin"])
        .output()
        .expect("Failed to run");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json, serde_json::json!(["heroin"]));
}

#[test]
fn test_config_in_default_location_is_used() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("rxcheck");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[risk]\ncustom = { kratom = 44 }\n",
    )
    .unwrap();

    cli(&temp_dir)
        .args(["overdose", "kratom"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overdose Risk Percentage: 44%"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = setup_test_dir();
    let config = write_config(&temp_dir, "[logging]\nlevel = \"loud\"\n");

    cli(&temp_dir)
        .arg("--config")
        .arg(&config)
        .args(["overdose", "fentanyl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

//! Integration tests for the `razzle` CLI commands.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn razzle() -> Command {
    Command::cargo_bin("razzle").unwrap()
}

/// Write a config file into a fresh temp directory.
fn config_file(name: &str, contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_reports_outcomes() {
    razzle()
        .args(["play", "-n", "500", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("500 games"))
        .stdout(predicate::str::contains("policy=heuristic"))
        .stdout(predicate::str::contains("Outcomes"))
        .stdout(predicate::str::contains("Average return"))
        .stdout(predicate::str::contains("Win rate"));
}

#[test]
fn play_is_reproducible_with_seed() {
    let first = razzle()
        .args(["play", "-n", "2000", "--seed", "11"])
        .output()
        .unwrap();
    let second = razzle()
        .args(["play", "-n", "2000", "--seed", "11"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn play_without_seed_uses_entropy() {
    razzle()
        .args(["play", "-n", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seed="));
}

#[test]
fn play_with_optimal_policy() {
    razzle()
        .args(["play", "-n", "100", "--seed", "1", "--policy", "optimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("policy=optimal"));
}

#[test]
fn play_rejects_zero_games() {
    razzle()
        .args(["play", "-n", "0", "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn play_rejects_unknown_policy() {
    razzle()
        .args(["play", "--policy", "reckless"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// one-roll
// ---------------------------------------------------------------------------

#[test]
fn one_roll_default_distribution() {
    razzle()
        .arg("one-roll")
        .assert()
        .success()
        .stdout(predicate::str::contains("3d6"))
        .stdout(predicate::str::contains("[9, 12]"))
        .stdout(predicate::str::contains("0.481481"))
        .stdout(predicate::str::contains("-1.013889"))
        .stdout(predicate::str::contains("0.356481"))
        .stdout(predicate::str::contains("Total probability: 1.000000"));
}

// ---------------------------------------------------------------------------
// exact
// ---------------------------------------------------------------------------

#[test]
fn exact_distribution_sums_to_one() {
    razzle()
        .args(["exact", "--policy", "exhaust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("policy=exhaust"))
        .stdout(predicate::str::contains("Expected value"))
        .stdout(predicate::str::contains("Total probability: 1.000000"));
}

// ---------------------------------------------------------------------------
// policy
// ---------------------------------------------------------------------------

#[test]
fn policy_table_lists_actions() {
    razzle()
        .arg("policy")
        .assert()
        .success()
        .stdout(predicate::str::contains("Optimal stopping"))
        .stdout(predicate::str::contains("STOP"))
        .stdout(predicate::str::contains("ROLL"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_prints_defaults() {
    razzle()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("numOfDiceP=3"))
        .stdout(predicate::str::contains("payIn=3"))
        .stdout(predicate::str::contains("yardsPerStep5P=18"))
        .stdout(predicate::str::contains("noScoreWindow=[9,12]"));
}

#[test]
fn config_prints_json() {
    razzle()
        .args(["config", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"num_dice\": 3"))
        .stdout(predicate::str::contains("\"stake\": 3"));
}

#[test]
fn config_reads_flat_file() {
    let (_dir, path) = config_file("params.txt", "numOfDiceP=2\nmaxRolls=4\n");
    razzle()
        .arg("--config")
        .arg(&path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("numOfDiceP=2"))
        .stdout(predicate::str::contains("maxRolls=4"));
}

#[test]
fn config_reads_json_file() {
    let (_dir, path) = config_file("game.json", r#"{"stake": 5, "max_rolls": 2}"#);
    razzle()
        .arg("--config")
        .arg(&path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("payIn=5"))
        .stdout(predicate::str::contains("maxRolls=2"));
}

#[test]
fn config_rejects_unknown_key() {
    let (_dir, path) = config_file("params.txt", "luckyNumber=7\n");
    razzle()
        .arg("--config")
        .arg(&path)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown parameter: luckyNumber"));
}

#[test]
fn config_rejects_invalid_values() {
    let (_dir, path) = config_file("game.json", r#"{"stake": 0}"#);
    razzle()
        .arg("--config")
        .arg(&path)
        .arg("one-roll")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn missing_config_file_fails() {
    razzle()
        .args(["--config", "/nonexistent/razzle.json", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load config"));
}

// ---------------------------------------------------------------------------
// tune
// ---------------------------------------------------------------------------

#[test]
fn tune_writes_loadable_params() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("final_params.txt");
    razzle()
        .args(["tune", "--exact", "--max-iterations", "1", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Iterations:     1"))
        .stdout(predicate::str::contains("Final parameters"));

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("Final avgProfit="));
    assert!(written.contains("Final winRate="));
    assert!(written.contains("noScoreWindow="));

    razzle()
        .arg("--config")
        .arg(&out)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("numOfDiceP="));
}

#[test]
fn tune_with_simulation() {
    razzle()
        .args([
            "tune",
            "--games",
            "500",
            "--seed",
            "3",
            "--max-iterations",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("500 games, seed=3"));
}

// ---------------------------------------------------------------------------
// logging
// ---------------------------------------------------------------------------

#[test]
fn verbose_tuning_logs_to_stderr() {
    razzle()
        .args(["-v", "tune", "--exact", "--max-iterations", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("tuning sweep"));
}

#[test]
fn quiet_by_default() {
    razzle()
        .args(["tune", "--exact", "--max-iterations", "1"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

use assert_cmd::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn write_level(source: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp level");
    tmp.write_all(source.as_bytes()).expect("write level");
    tmp
}

#[test]
fn puzzle_prints_level_summary() {
    let level = write_level("1 1 1 0\n2 1 1 3\n0 1 1 1\n");
    let mut cmd = Command::cargo_bin("blockroll-puzzle").expect("binary exists");
    cmd.arg(level.path()).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Loaded level 4x3 with 10 tiles (1 goals)"))
        .stdout(contains("Start at (0, 1)"));
}

#[test]
fn puzzle_rejects_malformed_levels() {
    let level = write_level("1 1 1\n1 1\n");
    let mut cmd = Command::cargo_bin("blockroll-puzzle").expect("binary exists");
    cmd.arg(level.path()).arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("row 1 has 2 columns, expected 3"));
}

#[test]
fn puzzle_requires_a_level_path() {
    let mut cmd = Command::cargo_bin("blockroll-puzzle").expect("binary exists");
    cmd.assert().failure().stderr(contains("Usage:"));
}

#[test]
fn trail_prints_ground_summary() {
    let mut cmd = Command::cargo_bin("blockroll-trail").expect("binary exists");
    cmd.args(["--size", "3", "--seed", "7", "--summary-only"]);
    cmd.assert()
        .success()
        .stdout(contains("Ground 7x7 with one hole"))
        .stdout(contains("Spawn at (3, 3)"));
}

#[test]
fn trail_rejects_bad_size() {
    let mut cmd = Command::cargo_bin("blockroll-trail").expect("binary exists");
    cmd.args(["--size", "0", "--summary-only"]);
    cmd.assert()
        .failure()
        .stderr(contains("--size must be at least 1"));
}

#[test]
fn trail_rejects_unknown_arguments() {
    let mut cmd = Command::cargo_bin("blockroll-trail").expect("binary exists");
    cmd.arg("--frobnicate");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --frobnicate"));
}

//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `condex` binary and verify
//! exit codes, stdout content, and stderr content.
//!
//! All tests set `current_dir` to the workspace root so that relative
//! paths to model fixtures resolve correctly.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `condex` binary, rooted at workspace.
fn condex() -> Command {
    let mut cmd = cargo_bin_cmd!("condex");
    cmd.current_dir(workspace_root());
    cmd.env_remove("RUST_LOG");
    cmd
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    condex()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Guard condition extraction for Event-B models",
        ));
}

#[test]
fn version_exits_0() {
    condex()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("condex"));
}

// ──────────────────────────────────────────────
// 2. Extract subcommand
// ──────────────────────────────────────────────

#[test]
fn extract_worked_example_prints_dump() {
    condex()
        .args(["extract", "fixtures/worked_example.json"])
        .assert()
        .success()
        .stdout("evt\n - [guard/1] a=b\n - [guard/2] c\u{2260}a\n\n");
}

#[test]
fn extract_with_wd_prints_wd_lines() {
    condex()
        .args(["extract", "--wd", "fixtures/crossing.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            " - [grd2/1] cars\u{f7}card(waiting)\u{2265}1\n     WD: finite(waiting)\u{2227}card(waiting)\u{2260}0\n",
        ));
}

#[test]
fn extract_json_output_is_conditions_table() {
    let out = condex()
        .args(["--output", "json", "extract", "fixtures/worked_example.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["model"], "worked_example");
    assert_eq!(json["events"][0]["conditions"][0]["id"], "guard/1");
    assert_eq!(json["events"][0]["conditions"][1]["predicate"], "c\u{2260}a");
    assert_eq!(json["events"][0]["conditions"][1]["wd"], "\u{22a4}");
}

#[test]
fn extract_toml_model() {
    condex()
        .args(["extract", "fixtures/crossing.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[grd1/2] cars\u{2265}0"));
}

#[test]
fn extract_bad_syntax_exits_1_naming_guard() {
    condex()
        .args(["extract", "fixtures/invalid/bad_syntax.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot parse guard grd2"));
}

#[test]
fn extract_json_error_is_json_object() {
    let out = condex()
        .args([
            "--output",
            "json",
            "extract",
            "fixtures/invalid/bad_type.json",
        ])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert!(json["error"].as_str().unwrap().contains("guard grd1"));
}

#[test]
fn extract_quiet_suppresses_error_text() {
    condex()
        .args(["--quiet", "extract", "fixtures/invalid/bad_type.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::is_empty());
}

#[test]
fn extract_nonexistent_file_exits_1() {
    condex()
        .args(["extract", "fixtures/missing.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read model"));
}

#[test]
fn extract_unsupported_extension_exits_1() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("model.yaml");
    fs::write(&path, "name: m").unwrap();

    condex()
        .args(["extract", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unsupported model format"));
}

#[test]
fn verbose_logs_to_stderr_only() {
    condex()
        .args(["-v", "extract", "fixtures/worked_example.json"])
        .assert()
        .success()
        .stdout("evt\n - [guard/1] a=b\n - [guard/2] c\u{2260}a\n\n")
        .stderr(predicate::str::contains("extracting event"));
}

// ──────────────────────────────────────────────
// 3. Check subcommand
// ──────────────────────────────────────────────

#[test]
fn check_reports_counts() {
    condex()
        .args(["check", "fixtures/crossing.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 6 guards in 3 events"));
}

#[test]
fn check_duplicate_guard_exits_1() {
    condex()
        .args(["check", "fixtures/invalid/duplicate_guard.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "duplicate guard label 'grd1' in event 'evt'",
        ));
}

#[test]
fn check_ill_typed_guard_exits_1() {
    condex()
        .args(["check", "fixtures/invalid/bad_type.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("type mismatch"));
}

// ──────────────────────────────────────────────
// 4. Split subcommand
// ──────────────────────────────────────────────

#[test]
fn split_prints_conditions_with_keys() {
    condex()
        .args(["split", "x : {a, b} & c > d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1] x=a"))
        .stdout(predicate::str::contains("[2] x=b"))
        .stdout(predicate::str::contains("[3] c>d    (key: c\u{2264}d)"));
}

#[test]
fn split_json_output() {
    let out = condex()
        .args(["--output", "json", "split", "a /= b => b < a"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["key"], "a=b");
    assert_eq!(json[1]["predicate"], "b<a");
    assert_eq!(json[1]["key"], "a\u{2264}b");
}

#[test]
fn split_unparseable_formula_exits_1() {
    condex()
        .args(["split", "a = "])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("at 4:"));
}

// ──────────────────────────────────────────────
// 5. Validate subcommand
// ──────────────────────────────────────────────

#[test]
fn validate_valid_model_exits_0() {
    condex()
        .args(["validate", "fixtures/crossing.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn validate_invalid_model_exits_1() {
    condex()
        .args(["validate", "fixtures/invalid/not_a_model.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid model"));
}

#[test]
fn validate_invalid_json_exits_1() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();

    condex()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error parsing JSON"));
}

#[test]
fn validate_json_output_lists_errors() {
    let out = condex()
        .args([
            "--output",
            "json",
            "validate",
            "fixtures/invalid/not_a_model.json",
        ])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["valid"], false);
    assert!(!json["errors"].as_array().unwrap().is_empty());
}

//! CLI Tests
//!
//! Runs the `acp-codegen` binary against a temp copy of the fixtures.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn setup() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let schema_dir = dir.path().join("schema");
    fs::create_dir_all(&schema_dir).unwrap();
    fs::write(schema_dir.join("schema.json"), include_str!("fixtures/acp_subset.json")).unwrap();
    fs::write(schema_dir.join("meta.json"), include_str!("fixtures/meta.json")).unwrap();
    fs::write(schema_dir.join("VERSION"), include_str!("fixtures/VERSION")).unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_acp-codegen"))
        .current_dir(dir)
        .args(args)
        .args(["--schema-dir", "schema", "--output-dir", "out", "--runtime-path", "crate"])
        .output()
        .unwrap()
}

#[test]
fn test_all_writes_both_files() {
    let dir = setup();
    let output = run(dir.path(), &["all"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let meta = fs::read_to_string(dir.path().join("out/meta.rs")).unwrap();
    assert_eq!(meta, include_str!("../src/protocol/meta.rs"));

    let schema = fs::read_to_string(dir.path().join("out/schema.rs")).unwrap();
    assert!(schema.starts_with("// Generated from schema/schema.json. Do not edit by hand.\n"));
    assert!(schema.contains("crate::discriminated_union! {"));
    assert!(!schema.starts_with('\u{feff}'));
}

#[test]
fn test_meta_only() {
    let dir = setup();
    let output = run(dir.path(), &["meta"]);
    assert!(output.status.success());
    assert!(dir.path().join("out/meta.rs").exists());
    assert!(!dir.path().join("out/schema.rs").exists());
}

#[test]
fn test_check_detects_drift() {
    let dir = setup();
    assert!(run(dir.path(), &["schema"]).status.success());

    // Fresh output is up to date
    let clean = run(dir.path(), &["schema", "--check"]);
    assert!(clean.status.success());

    let path = dir.path().join("out/schema.rs");
    let edited = fs::read_to_string(&path).unwrap().replace("pub struct SessionId(String);", "pub struct SessionId(u64);");
    fs::write(&path, &edited).unwrap();

    let stale = run(dir.path(), &["schema", "--check"]);
    assert!(!stale.status.success());
    let stdout = String::from_utf8_lossy(&stale.stdout);
    assert!(stdout.contains("-    pub struct SessionId(u64);"));
    assert!(stdout.contains("+    pub struct SessionId(String);"));

    // --check never writes
    assert_eq!(fs::read_to_string(&path).unwrap(), edited);
}

#[test]
fn test_check_reports_missing_file() {
    let dir = setup();
    let output = run(dir.path(), &["meta", "--check"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("out/meta.rs").exists());
}

#[test]
fn test_missing_schema_fails() {
    let dir = setup();
    fs::remove_file(dir.path().join("schema/schema.json")).unwrap();
    let output = run(dir.path(), &["schema"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load"));
}

//! Runs the `marcsift` binary against generated input.

mod common;

use std::fs;
use std::io::Write;
use std::process::Command;

use common::{create_book_record, create_serial_record, encode_records};
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

fn marcsift() -> Command {
    Command::new(env!("CARGO_BIN_EXE_marcsift"))
}

fn read_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_catalog_mapping_of_gzipped_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("records.mrc.gz");
    let output = dir.path().join("docs.jsonl");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&encode_records(&[create_book_record(), create_serial_record()]))
        .unwrap();
    fs::write(&input, encoder.finish().unwrap()).unwrap();

    let status = marcsift()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--source-label", "Test data"])
        .status()
        .unwrap();
    assert!(status.success());

    let docs = read_lines(&output);
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["id"], "ocm00012345");
    assert_eq!(docs[0]["source_facet"], "Test data");
    assert_eq!(docs[0]["language_facet"][0], "English");
    assert_eq!(docs[1]["format_facet"], "Serials");
}

#[test]
fn test_rules_file_and_limit() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("records.mrc");
    let rules = dir.path().join("rules.json");
    let output = dir.path().join("docs.jsonl");

    fs::write(
        &input,
        encode_records(&[create_serial_record(), create_book_record()]),
    )
    .unwrap();
    fs::write(
        &rules,
        r#"{"clean": true, "rules": [
            {"field": "id", "capability": "control_code"},
            {"field": "title", "marc": "245a"}
        ]}"#,
    )
    .unwrap();

    let status = marcsift()
        .arg(&input)
        .arg("--rules")
        .arg(&rules)
        .arg("--output")
        .arg(&output)
        .args(["--limit", "1"])
        .status()
        .unwrap();
    assert!(status.success());

    let docs = read_lines(&output);
    assert_eq!(docs.len(), 1);
    assert_eq!(
        docs[0],
        serde_json::json!({"id": "ser-77", "title": "Whalemen's shipping list"})
    );
}

#[test]
fn test_zero_limit_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("records.mrc");
    let output = dir.path().join("docs.jsonl");
    fs::write(
        &input,
        encode_records(&[create_book_record(), create_serial_record()]),
    )
    .unwrap();

    let status = marcsift()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--limit", "0"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(read_lines(&output).is_empty());
}

#[test]
fn test_bad_rules_file_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("records.mrc");
    let rules = dir.path().join("rules.json");
    fs::write(&input, encode_records(&[create_book_record()])).unwrap();
    fs::write(&rules, r#"{"rules": [{"field": "x", "marc": "abc"}]}"#).unwrap();

    let output = marcsift().arg(&input).arg("--rules").arg(&rules).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("abc"));
}

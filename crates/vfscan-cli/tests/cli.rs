//! Integration tests for the vfscan binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REPORT: &str = "Patient:\nPatient ID:\nDoe, John\n12345\nPSD  2.10 dB\n";

/// Helper to create a CLI command
fn vfscan() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vfscan"))
}

#[test]
fn test_process_tagged() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("report.txt");
    fs::write(&input, REPORT).unwrap();

    vfscan()
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[(1)]{\"Patient\":\"Doe John\""))
        .stdout(predicate::str::contains("\"Patient ID\":\"12345\""))
        .stdout(predicate::str::contains("\"PSD\":\"2.10 dB\""));
}

#[test]
fn test_process_report_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("report.txt");
    fs::write(&input, "Gender: Male\n").unwrap();

    vfscan()
        .args(["process", "-f", "report"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Missing critical fields: Patient, Patient ID, Date of Birth, Test Type",
        ));
}

#[test]
fn test_process_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("report.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, REPORT).unwrap();

    vfscan()
        .arg("process")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("[(1)]"));
}

#[test]
fn test_process_missing_file() {
    vfscan()
        .args(["process", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_process_invalid_utf8() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("report.txt");
    fs::write(&input, b"Patient ID: 12\xff45\n").unwrap();

    vfscan().arg("process").arg(&input).assert().failure();

    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"extraction":{"strict_utf8":false}}"#).unwrap();

    vfscan()
        .arg("--config")
        .arg(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[(1)]"));
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir(&input_dir).unwrap();
    fs::write(input_dir.join("a.txt"), REPORT).unwrap();
    fs::write(input_dir.join("b.txt"), "Strategy: SITA Fast\n").unwrap();
    fs::write(input_dir.join("notes.md"), "ignored").unwrap();

    let pattern = format!("{}/*", input_dir.display());

    vfscan()
        .args(["batch", &pattern, "--summary", "-j", "2"])
        .arg("-o")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    let a = fs::read_to_string(output_dir.join("a.txt")).unwrap();
    assert!(a.starts_with("[(1)]"));
    let b = fs::read_to_string(output_dir.join("b.txt")).unwrap();
    assert!(b.starts_with("[(0)]"));

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(
        lines[0],
        "filename,status,patient,patient_id,test_type,missing_critical,processing_time_ms,error"
    );
    assert!(lines[1].starts_with("a.txt,complete,Doe John,12345,,Date of Birth; Test Type,"));
    assert!(lines[2].starts_with("b.txt,partial,,,,"));
}

#[test]
fn test_batch_no_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.pdf", dir.path().display());

    vfscan()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");

    vfscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    vfscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    vfscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "pdf.min_text_length"])
        .assert()
        .success()
        .stdout("20\n");

    vfscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "output.pretty", "true"])
        .assert()
        .success();

    vfscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "output.pretty"])
        .assert()
        .success()
        .stdout("true\n");

    vfscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.critical_fields", r#"["Shoe Size"]"#])
        .assert()
        .failure();

    vfscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "pdf.nonexistent", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_path() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    vfscan()
        .arg("--config")
        .arg(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));
}

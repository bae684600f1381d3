#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn schedule_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    let document = json!({
        "properties": { "projectTitle": "CLI Project" },
        "tasks": [{
            "uniqueId": 1, "name": "CLI Project", "outlineLevel": 0,
            "children": [
                { "uniqueId": 2, "name": "Survey", "outlineLevel": 2,
                  "work": { "duration": 1, "units": "d" } },
                { "uniqueId": 3, "name": "Grade", "outlineLevel": 2,
                  "predecessors": [{ "predecessorUniqueId": 2 }] }
            ]
        }]
    });
    file.write_all(document.to_string().as_bytes()).unwrap();
    file
}

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("schedule-normalizer").expect("cli binary")
}

#[test]
fn parse_prints_json_by_default() {
    let file = schedule_file();
    let assert = cli().arg("parse").arg(file.path()).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["project"]["name"], json!("CLI Project"));
    assert_eq!(value["summary"]["units"], json!(2));
}

#[test]
fn summary_format_reports_coverage() {
    let file = schedule_file();
    cli()
        .args(["parse", "--format", "summary"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(str_contains("Project: CLI Project"))
        .stdout(str_contains("coverage 50.00%"));
}

#[test]
fn hours_per_day_flag_is_applied() {
    let file = schedule_file();
    let assert = cli()
        .args(["parse", "--hours-per-day", "10"])
        .arg(file.path())
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let survey = value["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == json!("2"))
        .unwrap()
        .clone();
    assert_eq!(survey["projectedHours"], json!(10.0));
}

#[test]
fn csv_output_file_is_written() {
    let file = schedule_file();
    let out = NamedTempFile::new().unwrap();
    cli()
        .args(["parse", "--format", "csv", "--output"])
        .arg(out.path())
        .arg(file.path())
        .assert()
        .success()
        .stderr(str_contains("Wrote 3 tasks"));
    let written = std::fs::read_to_string(out.path()).unwrap();
    assert!(written.starts_with("id,name,"));
    assert_eq!(written.lines().count(), 4);
}

#[test]
fn table_format_lists_task_names() {
    let file = schedule_file();
    cli()
        .args(["parse", "--format", "table"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(str_contains("| hierarchy_type"))
        .stdout(str_contains("Survey"));
}

#[test]
fn malformed_document_fails() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    cli()
        .arg("parse")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(str_contains("unable to read schedule"));
}

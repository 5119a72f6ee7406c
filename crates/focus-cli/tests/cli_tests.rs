//! Integration tests for the `focus` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to run the analyze and windows
//! subcommands through the actual binary against JSON calendar fixtures.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Run `focus analyze` for the fixture week and parse the JSON report.
fn analyze(args: &[&str]) -> Value {
    let output = Command::cargo_bin("focus")
        .unwrap()
        .arg("analyze")
        .args(["--week-of", "2026-03-18"])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// analyze
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn analyze_reports_five_weekdays() {
    let report = analyze(&["-i", &fixture("week.json")]);

    let days = report["days"].as_array().unwrap();
    assert_eq!(days.len(), 5);
    assert_eq!(days[0]["date"], "2026-03-16");
    assert_eq!(days[4]["date"], "2026-03-20");
    assert!(report["failures"].as_array().unwrap().is_empty());
}

#[test]
fn analyze_finds_fragments_and_bordering_meetings() {
    let report = analyze(&["-i", &fixture("week.json")]);
    let monday = &report["days"][0];

    assert_eq!(monday["fragmented"]["minutes"], 60);
    assert_eq!(monday["uninterrupted"]["minutes"], 330);
    assert_eq!(
        monday["unoptimized_meetings"],
        serde_json::json!(["evt-standup", "evt-1on1"])
    );
    assert_eq!(
        monday["fragmented"]["slots"][0]["start_display"],
        "2026-03-16 - 09:30:00"
    );

    let wednesday = &report["days"][2];
    assert_eq!(
        wednesday["unoptimized_meetings"],
        serde_json::json!(["evt-design", "evt-retro"])
    );
}

#[test]
fn analyze_empty_day_is_fully_uninterrupted() {
    let report = analyze(&["-i", &fixture("week.json")]);
    let tuesday = &report["days"][1];

    assert_eq!(tuesday["uninterrupted"]["minutes"], 510);
    assert_eq!(tuesday["fragmented"]["minutes"], 0);
    assert!(tuesday["unoptimized_meetings"].as_array().unwrap().is_empty());
}

#[test]
fn analyze_reads_stdin() {
    let snapshot = std::fs::read_to_string(fixture("week.json")).unwrap();

    Command::cargo_bin("focus")
        .unwrap()
        .args(["analyze", "--week-of", "2026-03-18"])
        .write_stdin(snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("evt-standup"));
}

#[test]
fn analyze_derives_busy_periods_from_events() {
    let report = analyze(&["-i", &fixture("events_only.json")]);

    assert_eq!(report["days"][0]["fragmented"]["minutes"], 60);
}

#[test]
fn analyze_parallel_matches_sequential() {
    let sequential = analyze(&["-i", &fixture("week.json")]);
    let parallel = analyze(&["-i", &fixture("week.json"), "--parallel"]);

    assert_eq!(sequential, parallel);
}

#[test]
fn analyze_with_timeout_produces_same_report() {
    let plain = analyze(&["-i", &fixture("week.json")]);
    let timed = analyze(&["-i", &fixture("week.json"), "--timeout-secs", "10"]);

    assert_eq!(plain, timed);
}

#[test]
fn malformed_busy_data_fails_only_that_day() {
    let report = analyze(&["-i", &fixture("overlapping.json")]);

    assert_eq!(report["days"].as_array().unwrap().len(), 4);
    let failures = report["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["date"], "2026-03-17");
    assert!(failures[0]["error"]
        .as_str()
        .unwrap()
        .contains("outside work window"));
}

#[test]
fn normalize_repairs_malformed_busy_data() {
    let report = analyze(&["-i", &fixture("overlapping.json"), "--normalize"]);

    assert!(report["failures"].as_array().unwrap().is_empty());
    let tuesday = &report["days"][1];
    assert_eq!(tuesday["fragmented"]["minutes"], 60);
    assert_eq!(tuesday["uninterrupted"]["minutes"], 330);
}

#[test]
fn config_file_and_flags_are_combined() {
    // config.json: 08:00-16:00, 60-minute threshold
    let report = analyze(&["-i", &fixture("week.json"), "--config", &fixture("config.json")]);
    let monday = &report["days"][0];
    assert_eq!(monday["fragmented"]["minutes"], 30);
    assert_eq!(monday["uninterrupted"]["minutes"], 330);

    // A flag overrides the file's threshold.
    let report = analyze(&[
        "-i",
        &fixture("week.json"),
        "--config",
        &fixture("config.json"),
        "--threshold-minutes",
        "90",
    ]);
    assert_eq!(report["days"][0]["fragmented"]["minutes"], 90);
}

#[test]
fn analyze_writes_output_file() {
    let output_path = std::env::temp_dir().join("focus-cli-test-report.json");
    let _ = std::fs::remove_file(&output_path);

    Command::cargo_bin("focus")
        .unwrap()
        .args(["analyze", "--week-of", "2026-03-18", "-i", &fixture("week.json"), "-o"])
        .arg(&output_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let report: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["days"].as_array().unwrap().len(), 5);

    let _ = std::fs::remove_file(&output_path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_input_file_fails() {
    Command::cargo_bin("focus")
        .unwrap()
        .args(["analyze", "-i", "/nonexistent/calendar.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn invalid_snapshot_fails() {
    Command::cargo_bin("focus")
        .unwrap()
        .args(["analyze", "--week-of", "2026-03-18"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse calendar snapshot"));
}

#[test]
fn inverted_work_day_fails() {
    Command::cargo_bin("focus")
        .unwrap()
        .args(["analyze", "--day-start", "18:00", "--day-end", "09:00"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid analysis settings"));
}

#[test]
fn bad_clock_time_is_rejected_by_argument_parser() {
    Command::cargo_bin("focus")
        .unwrap()
        .args(["windows", "--day-start", "half past nine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected HH:MM"));
}

// ─────────────────────────────────────────────────────────────────────────────
// windows
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn windows_lists_the_work_week() {
    let output = Command::cargo_bin("focus")
        .unwrap()
        .args(["windows", "--week-of", "2026-03-18"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let windows: Value = serde_json::from_slice(&output.stdout).unwrap();
    let windows = windows.as_array().unwrap();
    assert_eq!(windows.len(), 5);
    assert_eq!(windows[0]["date"], "2026-03-16");
    assert_eq!(windows[0]["start"], 1_773_653_400);
    assert_eq!(windows[0]["start_display"], "2026-03-16 - 09:30:00");
    assert_eq!(windows[0]["end_display"], "2026-03-16 - 18:00:00");
}

#[test]
fn windows_honors_timezone() {
    Command::cargo_bin("focus")
        .unwrap()
        .args([
            "windows",
            "--week-of",
            "2026-03-18",
            "--timezone",
            "Asia/Tokyo",
            "--day-start",
            "10:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-03-16 - 10:00:00"));
}

#[test]
fn windows_rejects_unknown_timezone() {
    Command::cargo_bin("focus")
        .unwrap()
        .args(["windows", "--timezone", "Nowhere/Special"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn explicit_empty_busy_list_means_a_free_day() {
    let report = analyze(&["-i", &fixture("free_events.json")]);
    let monday = &report["days"][0];

    assert_eq!(monday["uninterrupted"]["minutes"], 510);
    assert_eq!(monday["fragmented"]["minutes"], 0);
    assert!(monday["unoptimized_meetings"].as_array().unwrap().is_empty());
}

#[test]
fn out_of_range_threshold_is_rejected() {
    Command::cargo_bin("focus")
        .unwrap()
        .args(["analyze", "--threshold-minutes", "9223372036854775807"])
        .write_stdin("{}")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--threshold-minutes"));
}

#[test]
fn out_of_range_tolerance_is_rejected() {
    Command::cargo_bin("focus")
        .unwrap()
        .args(["analyze", "--tolerance-minutes=-1"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--tolerance-minutes"));
}

//! Basic CLI E2E tests.
//!
//! Each test runs the binary with HOME pointed at a fresh temp dir so the
//! database and config never touch the real data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_sleepwell"))
        .args(args)
        .env("HOME", home)
        .env_remove("SLEEPWELL_ENV")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn log_night(home: &Path, date: &str, bed: &str, wake: &str) {
    run_ok(
        home,
        &[
            "entry", "log", "--date", date, "--bedtime", bed, "--wake", wake, "--quality", "7",
            "--sleepiness", "2", "--stress", "3",
        ],
    );
}

#[test]
fn test_debt_without_profile_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["debt"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_profile_set_and_show() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["profile", "set", "--chronotype", "evening", "--target", "7.5"]);

    let out = run_ok(home.path(), &["profile", "show", "--json"]);
    let profile: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(profile["chronotype"], "evening");
    assert_eq!(profile["target_sleep_hours"], 7.5);
    assert_eq!(profile["user_id"], "default");
}

#[test]
fn test_entry_log_and_debt() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["profile", "set", "--target", "8"]);
    log_night(home.path(), "2024-05-01", "23:00", "06:30");

    let out = run_ok(home.path(), &["debt", "--date", "2024-05-01", "--json"]);
    let debt: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(debt["entries_count"], 1);
    assert_eq!(debt["total_debt"], 0.5);
}

#[test]
fn test_entry_log_reports_planned_schedule() {
    let home = tempfile::tempdir().unwrap();
    run_ok(
        home.path(),
        &["profile", "set", "--weekend-bedtime", "00:00", "--weekend-wake", "09:00"],
    );

    // 2024-05-03 is a Friday, 2024-05-04 a Saturday
    let weekday = run_ok(
        home.path(),
        &[
            "entry", "log", "--date", "2024-05-03", "--bedtime", "23:00", "--wake", "06:00",
            "--quality", "6", "--sleepiness", "3", "--stress", "4",
        ],
    );
    assert!(weekday.contains("planned 8.00h"), "{weekday}");

    let weekend = run_ok(
        home.path(),
        &[
            "entry", "log", "--date", "2024-05-04", "--bedtime", "00:00", "--wake", "08:00",
            "--quality", "6", "--sleepiness", "3", "--stress", "4",
        ],
    );
    assert!(weekend.contains("planned 9.00h"), "{weekend}");
}

#[test]
fn test_duplicate_entry_rejected() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["profile", "set"]);
    log_night(home.path(), "2024-05-02", "23:00", "07:00");

    let (_, stderr, code) = run_cli(
        home.path(),
        &[
            "entry", "log", "--date", "2024-05-02", "--bedtime", "22:00", "--wake", "06:00",
            "--quality", "5", "--sleepiness", "3", "--stress", "4",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("2024-05-02"));
}

#[test]
fn test_curve_json() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["profile", "set", "--chronotype", "morning"]);

    let out = run_ok(home.path(), &["curve", "--date", "2024-05-03", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["curve"]["points"].as_array().unwrap().len(), 24);
    assert_eq!(report["partial_data"], true);
}

#[test]
fn test_summary_generate_and_show() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["profile", "set"]);
    log_night(home.path(), "2024-05-06", "23:00", "06:00");
    log_night(home.path(), "2024-05-07", "23:30", "06:30");

    run_ok(
        home.path(),
        &["summary", "generate", "--period", "weekly", "--date", "2024-05-08"],
    );
    let out = run_ok(
        home.path(),
        &["summary", "show", "--period", "weekly", "--date", "2024-05-08", "--json"],
    );
    let summary: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(summary["entries_count"], 2);
    assert_eq!(summary["period_start"], "2024-05-06");
}

#[test]
fn test_empty_summary_is_not_stored() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["profile", "set"]);
    let out = run_ok(
        home.path(),
        &["summary", "generate", "--period", "daily", "--date", "2024-01-01"],
    );
    assert!(out.contains("No entries"));

    let (_, _, code) = run_cli(
        home.path(),
        &["summary", "show", "--period", "daily", "--date", "2024-01-01"],
    );
    assert_eq!(code, 1);
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["config", "set", "engine.debt_window_days", "14"]);
    let out = run_ok(home.path(), &["config", "get", "engine.debt_window_days"]);
    assert_eq!(out.trim(), "14");

    let (_, _, code) = run_cli(home.path(), &["config", "get", "engine.nope"]);
    assert_eq!(code, 1);

    let (_, _, code) = run_cli(
        home.path(),
        &["config", "set", "engine.debt_window_days", "200000000"],
    );
    assert_eq!(code, 1);
    let out = run_ok(home.path(), &["config", "get", "engine.debt_window_days"]);
    assert_eq!(out.trim(), "14");
}

#[test]
fn test_user_flag_isolates_profiles() {
    let home = tempfile::tempdir().unwrap();
    run_ok(home.path(), &["--user", "bob", "profile", "set", "--target", "9"]);
    let (_, _, code) = run_cli(home.path(), &["profile", "show"]);
    assert_eq!(code, 1);
    let out = run_ok(home.path(), &["profile", "show", "--user", "bob", "--json"]);
    assert!(out.contains("\"bob\""));
}

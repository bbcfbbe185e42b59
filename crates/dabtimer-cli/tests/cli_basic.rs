//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temporary directory,
//! so config and database files never touch the real user data.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_dabtimer-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("DABTIMER_ENV")
        .env_remove("DABTIMER_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command failed {args:?}: {stderr}");
    stdout
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_default_durations() {
    let home = tempfile::tempdir().unwrap();
    let json = parse_json(&run_cli_success(home.path(), &["durations"]));
    assert_eq!(json["heat_secs"], 25);
    assert_eq!(json["cool_secs"], 40);
    assert_eq!(json["source"], "computed");
}

#[test]
fn test_durations_with_flags() {
    let home = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(
        home.path(),
        &[
            "durations",
            "--material",
            "titanium",
            "--concentrate",
            "wax",
            "--heater",
            "bic_lighter",
            "--rig",
            "recycler",
        ],
    );
    let json = parse_json(&stdout);
    assert_eq!(json["heat_secs"], 53);
    assert_eq!(json["cool_secs"], 40);
}

#[test]
fn test_durations_explain() {
    let home = tempfile::tempdir().unwrap();
    let json = parse_json(&run_cli_success(home.path(), &["durations", "--explain"]));
    assert_eq!(json["heater_modifier"], 1.0);
    assert_eq!(json["heat_floored"], false);
}

#[test]
fn test_unknown_heater_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["durations", "--heater", "blowtorch"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown heater key 'blowtorch'"), "{stderr}");
}

#[test]
fn test_custom_durations_override() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["custom", "set", "--heat", "12", "--cool", "90"]);
    let json = parse_json(&run_cli_success(home.path(), &["durations"]));
    assert_eq!(json["heat_secs"], 12);
    assert_eq!(json["cool_secs"], 90);
    assert_eq!(json["source"], "custom");

    run_cli_success(home.path(), &["custom", "disable"]);
    let json = parse_json(&run_cli_success(home.path(), &["durations"]));
    assert_eq!(json["heat_secs"], 25);
}

#[test]
fn test_custom_out_of_bounds_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["custom", "set", "--heat", "2", "--cool", "90"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("outside the allowed range"), "{stderr}");
}

#[test]
fn test_timer_start_requires_init() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["timer", "start"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not been initialized"), "{stderr}");
}

#[test]
fn test_timer_cycle_is_recorded() {
    let home = tempfile::tempdir().unwrap();
    run_cli_success(home.path(), &["custom", "set", "--heat", "5", "--cool", "30"]);
    run_cli_success(home.path(), &["timer", "init"]);
    run_cli_success(home.path(), &["timer", "start"]);

    let stdout = run_cli_success(home.path(), &["timer", "tick", "-n", "5"]);
    assert!(stdout.contains("PhaseChanged"), "{stdout}");

    let stdout = run_cli_success(home.path(), &["timer", "tick", "-n", "100"]);
    assert!(stdout.contains("CycleCompleted"), "{stdout}");

    let status = parse_json(&run_cli_success(home.path(), &["timer", "status"]));
    assert_eq!(status["phase"], "complete");

    let stats = parse_json(&run_cli_success(home.path(), &["stats", "show", "--range", "day"]));
    assert_eq!(stats["total_count"], 1);
    assert_eq!(stats["most_frequent_concentrate"], "shatter");

    let history = parse_json(&run_cli_success(home.path(), &["stats", "history"]));
    assert_eq!(history.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_stats_empty_previous_week() {
    let home = tempfile::tempdir().unwrap();
    let stats = parse_json(&run_cli_success(
        home.path(),
        &["stats", "show", "--range", "week", "--anchor", "2026-10-19", "--offset", "-1"],
    ));
    assert_eq!(stats["total_count"], 0);
    assert_eq!(stats["days_in_window"], 7);
    assert!(stats["most_frequent_concentrate"].is_null());
}

#[test]
fn test_stats_clear_needs_confirmation() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["stats", "clear"]);
    assert_eq!(code, 1);
    run_cli_success(home.path(), &["stats", "clear", "--yes"]);
}

#[test]
fn test_config_get_and_set() {
    let home = tempfile::tempdir().unwrap();
    let value = run_cli_success(home.path(), &["config", "get", "selection.material"]);
    assert_eq!(value.trim(), "quartz");

    run_cli_success(home.path(), &["config", "set", "selection.heater", "bic_lighter"]);
    let value = run_cli_success(home.path(), &["config", "get", "selection.heater"]);
    assert_eq!(value.trim(), "bic_lighter");

    let (_, _, code) = run_cli(home.path(), &["config", "get", "selection.bowl"]);
    assert_eq!(code, 1);
}

#[test]
fn test_catalog_keys_in_order() {
    let home = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(home.path(), &["catalog", "list", "--keys"]);
    assert!(stdout.contains("material: quartz, titanium, ceramic"), "{stdout}");
    assert!(stdout.contains("heater: butane_torch, bic_lighter, acetylene_torch"), "{stdout}");
}

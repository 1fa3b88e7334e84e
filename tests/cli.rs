//! Runs the `hs-access` binary against the bundled demo script.

use std::process::Command;

use serde_json::Value;

fn hs_access(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_hs-access"))
        .args(args)
        .env("HSACCESS__LOGGING__LEVEL", "warn")
        .output()
        .expect("Failed to run hs-access")
}

fn result_at(rows: &[Value], line: u64) -> &str {
    rows.iter()
        .find(|row| row["line"] == line)
        .and_then(|row| row["result"].as_str())
        .unwrap_or_else(|| panic!("no row for line {line}"))
}

#[test]
fn test_replay_demo_script() {
    let output = hs_access(&["--format", "json", "replay", "demos/cat_dog_holes.jsonl"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let rows: Vec<Value> = serde_json::from_slice(&output.stdout).expect("JSON report");
    assert_eq!(rows.len(), 21);

    assert_eq!(result_at(&rows, 7), "true");
    assert_eq!(result_at(&rows, 8), "false");
    assert_eq!(result_at(&rows, 10), "false");
    assert_eq!(result_at(&rows, 11), "true");
    assert_eq!(
        result_at(&rows, 13),
        "denied: Cannot grant a privilege stronger than your own"
    );
    assert_eq!(result_at(&rows, 18), "change (grant)");
    assert_eq!(result_at(&rows, 19), "denied: Groups cannot own resources");
    assert_eq!(
        result_at(&rows, 21),
        "denied: Cannot remove last owner of resource"
    );
    assert_eq!(result_at(&rows, 23), "false");
    assert_eq!(result_at(&rows, 25), "false");
}

#[test]
fn test_strict_replay_fails_on_denial() {
    let output = hs_access(&["replay", "--strict", "demos/cat_dog_holes.jsonl"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("3 step(s) denied"));
}

#[test]
fn test_missing_script_is_reported() {
    let output = hs_access(&["replay", "demos/does-not-exist.jsonl"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn test_config_show_json() {
    let output = hs_access(&["--format", "json", "config", "show"]);
    assert!(output.status.success());
    let config: Value = serde_json::from_slice(&output.stdout).expect("JSON config");
    assert_eq!(config["access"]["notify_buffer"], 256);
    assert_eq!(config["logging"]["level"], "warn");
}

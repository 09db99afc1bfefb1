//! Integration tests for top-level CLI behavior.

use std::path::PathBuf;
use std::process::Command;

fn run_tasklist(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_tasklist");
    Command::new(bin)
        .args(args)
        .env_remove("TASKLIST_RECORD")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tasklist binary")
}

/// Writes a cassette whose single `list` call returns `data`.
fn list_cassette(name: &str, data: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("tasklist_cli_tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{name}.cassette.yaml"));
    let yaml = format!(
        r#"name: {name}
recorded_at: "2025-03-15T14:30:00Z"
api_url: https://example.com/api/todos
interactions:
  - seq: 0
    port: tasks
    method: list
    input: null
    output:
      Ok:
        success: true
        data: {data}
"#
    );
    std::fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn help_lists_subcommands() {
    let output = run_tasklist(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for command in ["list", "add", "edit", "delete", "shell"] {
        assert!(stdout.contains(command), "missing {command} in:\n{stdout}");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_tasklist(&["frobnicate"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn list_from_empty_cassette_shows_empty_message() {
    let cassette = list_cassette("empty", "[]");
    let output = run_tasklist(&["--replay", cassette.to_str().unwrap(), "list"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("No any Todo Data available"));
}

#[test]
fn list_from_cassette_prints_table() {
    let cassette = list_cassette(
        "two",
        r#"[{"_id": "a1", "title": "Buy milk", "completed": false}, {"_id": "b2", "title": "Walk dog", "completed": true}]"#,
    );
    let output = run_tasklist(&["--replay", cassette.to_str().unwrap(), "list"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Buy milk  Pending"));
    assert!(stdout.contains("Walk dog  Complete"));
}

#[test]
fn adding_blank_title_alerts_and_fails() {
    let cassette = list_cassette("blank", "[]");
    let output = run_tasklist(&["--replay", cassette.to_str().unwrap(), "add", "   "]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Please enter a task name."));
}

#[test]
fn missing_cassette_is_reported() {
    let output = run_tasklist(&["--replay", "/nonexistent/none.yaml", "list"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Failed to read cassette file"));
}

#[test]
fn invalid_api_url_is_reported() {
    let output = run_tasklist(&["--api-url", "not a url", "list"]);
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}

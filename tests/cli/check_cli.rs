use std::fs;
use std::path::{Path, PathBuf};

use predicates::prelude::predicate;
use serde_json::{Value, json};
use tempfile::tempdir;

fn write_request(dir: &Path, assertions: Value) -> PathBuf {
    let path = dir.join("request.json");
    let request = json!({
        "workspaceId": "9",
        "monitorId": "314",
        "url": "https://api.example.com/health",
        "method": "GET",
        "cronTimestamp": 1_700_000_060_000i64,
        "status": "active",
        "assertions": assertions
    });
    fs::write(&path, request.to_string()).expect("write request");
    path
}

fn parse_stdout(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("stdout json")
}

#[test]
fn passing_check_exits_zero_with_envelope() {
    let dir = tempdir().expect("temp dir");
    let request = write_request(
        dir.path(),
        json!([
            {"type": "status", "compare": "eq", "target": 200},
            {"type": "header", "key": "content-type", "compare": "contains", "target": "json"}
        ]),
    );

    let output = assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .args(["check", "--request"])
        .arg(&request)
        .write_stdin(r#"{"status":200,"headers":{"Content-Type":"application/json"},"body":"{}"}"#)
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());
    let payload = parse_stdout(&output.stdout);
    assert_eq!(payload["monitorId"], json!("314"));
    assert_eq!(payload["cronTimestamp"], json!(1_700_000_060_000i64));
    assert_eq!(payload["verdict"]["passed"], json!(true));
    assert_eq!(payload["verdict"]["assertion_count"], json!(2));
}

#[test]
fn failing_check_exits_two_and_keeps_order() {
    let dir = tempdir().expect("temp dir");
    let request = write_request(
        dir.path(),
        json!([
            {"type": "status", "compare": "eq", "target": 200},
            {"type": "unknown"},
            {"type": "textBody", "compare": "not_contains", "target": "error"}
        ]),
    );
    let response = dir.path().join("response.json");
    fs::write(&response, r#"{"status":503,"body":"upstream error"}"#).expect("write response");

    let output = assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .args(["check", "--request"])
        .arg(&request)
        .arg("--response")
        .arg(&response)
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(2));
    let payload = parse_stdout(&output.stdout);
    let results = payload["verdict"]["results"].as_array().expect("results");
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["message"], json!("expected status to equal 200, got 503"));
    assert_eq!(results[1]["error"], json!("decode_error"));
    assert_eq!(
        results[2]["message"],
        json!(r#"expected text body to not contain "error", got "upstream error""#)
    );
    assert_eq!(payload["verdict"]["failure_count"], json!(3));
}

#[test]
fn preview_chars_flag_truncates_messages() {
    let dir = tempdir().expect("temp dir");
    let request = write_request(
        dir.path(),
        json!([{"type": "textBody", "compare": "eq", "target": "short"}]),
    );

    let output = assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .args(["check", "--preview-chars", "4", "--request"])
        .arg(&request)
        .write_stdin(r#"{"status":200,"body":"a much longer body"}"#)
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(2));
    let payload = parse_stdout(&output.stdout);
    assert_eq!(
        payload["verdict"]["results"][0]["message"],
        json!(r#"expected text body to equal "short", got "a mu...""#)
    );
    assert_eq!(
        payload["verdict"]["results"][0]["actual"],
        json!("a much longer body")
    );
}

#[test]
fn config_file_sets_preview_chars() {
    let dir = tempdir().expect("temp dir");
    let request = write_request(
        dir.path(),
        json!([{"type": "textBody", "compare": "eq", "target": "x"}]),
    );
    let config = dir.path().join("probeq.toml");
    fs::write(&config, "[report]\npreview_chars = 2\n").expect("write config");

    let output = assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .arg("--config")
        .arg(&config)
        .args(["check", "--request"])
        .arg(&request)
        .write_stdin(r#"{"status":200,"body":"abc"}"#)
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(2));
    let payload = parse_stdout(&output.stdout);
    assert_eq!(
        payload["verdict"]["results"][0]["message"],
        json!(r#"expected text body to equal "x", got "ab...""#)
    );
}

#[test]
fn invalid_config_is_usage_error() {
    let dir = tempdir().expect("temp dir");
    let request = write_request(dir.path(), json!([]));
    let config = dir.path().join("probeq.toml");
    fs::write(&config, "[report]\npreview_chars = 0\n").expect("write config");

    assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .arg("--config")
        .arg(&config)
        .args(["check", "--request"])
        .arg(&request)
        .write_stdin(r#"{"status":200}"#)
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("preview_chars must be at least 1"));
}

#[test]
fn unreachable_probe_fails_all_assertions() {
    let dir = tempdir().expect("temp dir");
    let request = write_request(
        dir.path(),
        json!([{"type": "status", "compare": "eq", "target": 200}]),
    );

    let output = assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .args(["check", "--request"])
        .arg(&request)
        .write_stdin(r#"{"error":"connection refused"}"#)
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(2));
    let payload = parse_stdout(&output.stdout);
    assert_eq!(
        payload["verdict"]["results"][0]["message"],
        json!("probe did not complete: connection refused")
    );
}

#[test]
fn malformed_response_is_usage_error() {
    let dir = tempdir().expect("temp dir");
    let request = write_request(dir.path(), json!([]));

    let output = assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .args(["check", "--request"])
        .arg(&request)
        .write_stdin(r#"{"headers":{}}"#)
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let stderr: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(stderr["error"], json!("input_usage_error"));
    let message = stderr["message"].as_str().expect("message");
    assert!(message.contains("missing field `status`"), "{message}");
}

#[test]
fn emit_pipeline_reports_sources_and_steps() {
    let dir = tempdir().expect("temp dir");
    let request = write_request(
        dir.path(),
        json!([{"type": "status", "compare": "eq", "target": 200}]),
    );

    let output = assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .args(["--emit-pipeline", "check", "--request"])
        .arg(&request)
        .write_stdin(r#"{"status":200}"#)
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(0));
    let text = String::from_utf8(output.stderr).expect("stderr utf8");
    let line = text.lines().last().expect("pipeline line");
    let report: Value = serde_json::from_str(line).expect("pipeline json");
    assert_eq!(report["command"], json!("check"));
    assert_eq!(report["input"]["sources"][0]["label"], json!("request"));
    assert_eq!(report["input"]["sources"][0]["format"], json!("json"));
    assert_eq!(report["input"]["sources"][1]["source"], json!("stdin"));
    assert_eq!(report["steps"][2], json!("decode_assertions"));
}

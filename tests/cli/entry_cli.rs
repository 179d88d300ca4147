use predicates::prelude::predicate;
use serde_json::Value;

#[test]
fn help_is_available() {
    assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("lint"));
}

#[test]
fn version_is_available() {
    assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("probeq")
        .arg("probe")
        .output()
        .expect("run command");

    assert_eq!(output.status.code(), Some(3));
    let stderr: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(stderr["error"], Value::from("input_usage_error"));
    assert_eq!(stderr["details"]["kind"], Value::from("cli_parse_error"));
}

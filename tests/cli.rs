use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("onwave").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: onwave [OPTIONS] <COMMAND>"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("--inference-url <INFERENCE_URL>"))
        .stdout(predicate::str::contains("[env: ONWAVE_INFERENCE_URL").not())
        .stdout(predicate::str::contains("--version"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("onwave").unwrap();
    cmd.arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: onwave serve"))
        .stdout(predicate::str::contains("--port <PORT>"))
        .stdout(predicate::str::contains("[default: 9900]"));
}

#[test]
fn test_cli_chat_help() {
    let mut cmd = Command::cargo_bin("onwave").unwrap();
    cmd.arg("chat")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: onwave chat"));
}

#[test]
fn test_cli_no_command() {
    let mut cmd = Command::cargo_bin("onwave").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage: onwave [OPTIONS] <COMMAND>"));
}

#[test]
fn test_cli_rejects_bad_port() {
    let mut cmd = Command::cargo_bin("onwave").unwrap();
    cmd.args(["serve", "--port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'not-a-port'"));
}

#[test]
fn test_cli_serve_exits_nonzero_when_port_taken() {
    let taken = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
    let port = taken.local_addr().unwrap().port().to_string();

    let mut cmd = Command::cargo_bin("onwave").unwrap();
    cmd.args(["serve", "--port", &port])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to bind to address"));
}

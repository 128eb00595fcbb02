//! Integration tests for the `tq` binary.
//!
//! Query tests use `sh -c cat` as the filter program so they run without jq.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const CONFIG: &str = r#"resource "aws_instance" "web" {
  instance_type = "t2.micro"
  ami = local.ami
}
locals {
  region = "eu-west-1"
}
"#;

const CANONICAL: &str = r#"resource "aws_instance" "web" {
  ami           = local.ami
  instance_type = "t2.micro"
}

locals {
  region = "eu-west-1"
}
"#;

/// The binary with a clean environment for tq's own variables.
fn tq() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tq"));
    command
        .env_remove("TQ_CONFIG")
        .env_remove("TQ_JQ")
        .env_remove("RUST_LOG");
    command
}

fn run_with_stdin(mut command: Command, stdin: &[u8]) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start tq");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin)
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for tq")
}

fn setup_config_file() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("main.tf");
    fs::write(&path, CONFIG).unwrap();
    (dir, path)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_cli_help() {
    let output = tq().arg("--help").output().unwrap();
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("query"));
    assert!(text.contains("to-json"));
    assert!(text.contains("from-json"));
}

#[test]
fn test_to_json_from_file() {
    let (_dir, path) = setup_config_file();
    let output = tq().arg("to-json").arg(&path).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), 1);

    let document = tq::Document::from_json(text.as_bytes()).unwrap();
    assert_eq!(document.body.blocks.len(), 2);
    assert_eq!(document.body.blocks[0].attributes["ami"], "local.ami");
}

#[test]
fn test_to_json_pretty() {
    let mut command = tq();
    command.args(["to-json", "--pretty"]);
    let output = run_with_stdin(command, CONFIG.as_bytes());
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).lines().count() > 1);
}

#[test]
fn test_from_json_stdin() {
    let json = r#"{"body":{"blocks":[{"type":"resource","labels":["testing"],"attributes":{"hello":"\"world\""}}]}}"#;
    let mut command = tq();
    command.arg("from-json");
    let output = run_with_stdin(command, json.as_bytes());

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "resource \"testing\" {\n  hello = \"world\"\n}\n");
}

#[test]
fn test_from_json_rejects_non_documents() {
    let mut command = tq();
    command.arg("from-json");
    let output = run_with_stdin(command, b"[1, 2, 3]");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("is not a tq JSON document"));
}

#[test]
fn test_to_json_reports_syntax_errors() {
    let mut command = tq();
    command.arg("to-json");
    let output = run_with_stdin(command, b"terraform {\n  required_providers {\n");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("invalid HCL syntax"));
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let output = tq()
        .arg("to-json")
        .arg(dir.path().join("missing.tf"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to open"));
}

#[cfg(unix)]
mod query {
    use super::*;

    fn query_with_cat(path: &Path) -> Command {
        let mut command = tq();
        command
            .args(["query", "."])
            .arg(path)
            .args(["--jq", "sh", "--jq-arg", "-c", "--jq-arg", "cat"]);
        command
    }

    #[test]
    fn test_query_with_custom_program() {
        let (_dir, path) = setup_config_file();
        let output = query_with_cat(&path).output().unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(stdout(&output), CANONICAL);
    }

    #[test]
    fn test_query_program_from_env() {
        let (_dir, path) = setup_config_file();
        let output = tq()
            .args(["query", "."])
            .arg(&path)
            .args(["--jq-arg", "-c", "--jq-arg", "cat"])
            .env("TQ_JQ", "sh")
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(stdout(&output), CANONICAL);
    }

    #[test]
    fn test_query_program_from_config_file() {
        let (dir, path) = setup_config_file();
        let config = dir.path().join("tq.toml");
        fs::write(
            &config,
            "[filter]\nprogram = \"sh\"\nargs = [\"-c\", \"cat >/dev/null; echo local.ami\"]\n",
        )
        .unwrap();

        let output = tq()
            .args(["query", "."])
            .arg(&path)
            .arg("--config")
            .arg(&config)
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(stdout(&output), "local.ami\n");
    }

    #[test]
    fn test_query_config_from_env() {
        let (dir, path) = setup_config_file();
        let config = dir.path().join("tq.toml");
        fs::write(
            &config,
            "strict = true\n[filter]\nprogram = \"sh\"\nargs = [\"-c\", \"cat >/dev/null; echo '[1]'\"]\n",
        )
        .unwrap();

        let output = tq()
            .args(["query", "."])
            .arg(&path)
            .env("TQ_CONFIG", &config)
            .output()
            .unwrap();

        assert!(!output.status.success());
        assert!(stderr(&output).contains("cannot be converted back"));
    }

    #[test]
    fn test_missing_env_config_warns_and_uses_defaults() {
        let (dir, path) = setup_config_file();
        let output = query_with_cat(&path)
            .env("TQ_CONFIG", dir.path().join("nope.toml"))
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stderr(&output).contains("TQ_CONFIG is set but path doesn't exist"));
        assert_eq!(stdout(&output), CANONICAL);
    }

    #[test]
    fn test_strict_flag_fails_on_raw_output() {
        let (_dir, path) = setup_config_file();
        let output = tq()
            .args(["query", "--strict", "."])
            .arg(&path)
            .args([
                "--jq",
                "sh",
                "--jq-arg",
                "-c",
                "--jq-arg",
                "cat >/dev/null; echo local.ami",
            ])
            .output()
            .unwrap();

        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
        assert!(stderr(&output).contains("cannot be converted back"));
    }

    #[test]
    fn test_failing_filter_surfaces_stderr() {
        let (_dir, path) = setup_config_file();
        let output = tq()
            .args(["query", "."])
            .arg(&path)
            .args([
                "--jq",
                "sh",
                "--jq-arg",
                "-c",
                "--jq-arg",
                "cat >/dev/null; echo 'jq: error: nope' >&2; exit 3",
            ])
            .output()
            .unwrap();

        assert!(!output.status.success());
        assert!(stderr(&output).contains("jq: error: nope"));
    }

    #[test]
    fn test_filter_warnings_reach_stderr() {
        let (_dir, path) = setup_config_file();
        let output = tq()
            .args(["query", "."])
            .arg(&path)
            .args([
                "--jq",
                "sh",
                "--jq-arg",
                "-c",
                "--jq-arg",
                "cat; echo 'jq: warning: deprecated' >&2",
            ])
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(stdout(&output), CANONICAL);
        assert!(stderr(&output).contains("jq: warning: deprecated"));
    }

    #[test]
    fn test_query_reads_stdin() {
        let mut command = tq();
        command.args(["query", ".", "--jq", "sh", "--jq-arg", "-c", "--jq-arg", "cat"]);
        let output = run_with_stdin(command, CONFIG.as_bytes());

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(stdout(&output), CANONICAL);
    }
}

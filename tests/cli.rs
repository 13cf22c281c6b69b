//! Tests for the `capnorm` binary's stdout contract and exit status.

#![cfg(all(unix, feature = "cli"))]

mod common;

use common::{fake_tool, print_stdout, spawn_lock};
use std::process::{Command, Output};
use tempfile::TempDir;

const USAGE_ERROR_LINE: &str = "{\"success\":false,\"error\":\"URL not provided\"}\n";

fn capnorm_command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_capnorm"));
    cmd.args(args)
        .env_remove("CAPNORM_TOOL")
        .env_remove("CAPTURE_TOOL_PATH")
        .env_remove("RUST_LOG")
        .env("CAPNORM_NO_PROGRESS", "true");
    cmd
}

fn capnorm(args: &[&str]) -> Output {
    capnorm_command(args).output().unwrap()
}

/// A tool at `<tmp>/tools/cpp_app` that prints the directory it runs in.
fn pwd_tool() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("tools")).unwrap();
    fake_tool(
        &dir.path().join("tools"),
        "cpp_app",
        r#"printf '{"success":true,"content":"<p>%s</p>"}' "$(pwd -P)""#,
    );
    dir
}

fn expected_pwd_line(dir: &TempDir) -> String {
    let tools = dir.path().join("tools").canonicalize().unwrap();
    format!(
        "{{\"success\":true,\"data\":\"Content:\\n  {}\"}}\n",
        tools.display()
    )
}

#[test]
fn test_missing_url_is_usage_error() {
    let out = capnorm(&[]);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(String::from_utf8_lossy(&out.stdout), USAGE_ERROR_LINE);
    assert!(!out.stderr.is_empty(), "usage text goes to stderr");
}

#[test]
fn test_two_urls_is_usage_error() {
    let out = capnorm(&["https://a.test", "https://b.test"]);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(String::from_utf8_lossy(&out.stdout), USAGE_ERROR_LINE);
}

#[test]
fn test_help_is_not_a_usage_error() {
    let out = capnorm(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("capnorm"));
}

#[test]
fn test_success_prints_one_json_line() {
    let _guard = spawn_lock();
    let dir = TempDir::new().unwrap();
    let tool = fake_tool(
        dir.path(),
        "cpp_app",
        &print_stdout(
            r#"loading...
{"success":true,"content":"<title>Hi</title><p>All good here.</p>","screenshot":"s.png"}"#,
        ),
    );
    let out = capnorm(&["--tool", tool.to_str().unwrap(), "https://example.com"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert_eq!(
        stdout,
        "{\"success\":true,\"data\":\"Title: Hi\\n\\nContent:\\n  All good here.\",\"screenshot\":\"s.png\"}\n"
    );
}

#[test]
fn test_failure_exits_nonzero() {
    let _guard = spawn_lock();
    let dir = TempDir::new().unwrap();
    let tool = fake_tool(dir.path(), "cpp_app", "echo 'network error' >&2\nexit 1");
    let out = capnorm(&["--tool", tool.to_str().unwrap(), "https://example.com"]);

    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "{\"success\":false,\"error\":\"network error\"}\n"
    );
}

#[test]
fn test_missing_explicit_tool() {
    let out = capnorm(&["--tool", "/nonexistent/cpp_app", "https://example.com"]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("{\"success\":false,\"error\":\"capture tool not found"));
    assert!(stdout.contains("/nonexistent/cpp_app"));
}

#[test]
fn test_relative_tool_flag() {
    let _guard = spawn_lock();
    let dir = pwd_tool();
    let out = capnorm_command(&["--tool", "tools/cpp_app", "https://example.com"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&out.stdout), expected_pwd_line(&dir));
}

#[test]
fn test_relative_tool_path_env() {
    let _guard = spawn_lock();
    let dir = pwd_tool();
    let out = capnorm_command(&["https://example.com"])
        .env("CAPTURE_TOOL_PATH", "./tools/cpp_app")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&out.stdout), expected_pwd_line(&dir));
}

#[test]
fn test_compact_style_flag() {
    let _guard = spawn_lock();
    let dir = TempDir::new().unwrap();
    let tool = fake_tool(
        dir.path(),
        "cpp_app",
        &print_stdout(r#"{"success":true,"content":"<h1>Head</h1><p>Body line.</p>"}"#),
    );
    let out = capnorm(&[
        "--tool",
        tool.to_str().unwrap(),
        "--style",
        "compact",
        "https://example.com",
    ]);
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "{\"success\":true,\"data\":\"Content:\\nHead\\nBody line.\"}\n"
    );
}

#[test]
fn test_inverted_fragment_limits_are_rejected() {
    let _guard = spawn_lock();
    let dir = TempDir::new().unwrap();
    let tool = fake_tool(dir.path(), "cpp_app", "exit 0");
    let out = capnorm(&[
        "--tool",
        tool.to_str().unwrap(),
        "--min-fragment-chars",
        "50",
        "--max-fragment-chars",
        "10",
        "https://example.com",
    ]);
    assert_eq!(out.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("{\"success\":false,\"error\":\"Invalid configuration"));
}

#![cfg(feature = "cli")]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn run_with_stdin(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dataframe"))
        .args(["--log-level", "error"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("dataframe should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin)
        .expect("stdin should accept input");
    child.wait_with_output().expect("dataframe should finish")
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

fn unique_temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "dataframe-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn encode_hex_then_decode_round_trips() {
    let encoded = run_with_stdin(&["encode", "--hex"], br#"{"a":1,"b":[true,"x"]}"#);
    assert!(encoded.status.success());
    let hex = stdout_text(&encoded);
    assert!(hex.starts_with("0161"));

    let decoded = run_with_stdin(&["decode", "--hex"], hex.as_bytes());
    assert!(decoded.status.success());
    assert_eq!(stdout_text(&decoded), r#"{"a":1,"b":[true,"x"]}"#);
}

#[test]
fn encode_writes_raw_bytes_to_file() {
    let path = unique_temp_path("encode");
    let output = run_with_stdin(
        &["encode", "--output", path.to_str().expect("utf-8 temp path")],
        br#"{"n":true}"#,
    );
    assert!(output.status.success());
    assert_eq!(
        std::fs::read(&path).expect("output file should exist"),
        vec![1, b'n', 14, 1]
    );

    let decoded = Command::new(env!("CARGO_BIN_EXE_dataframe"))
        .args(["decode", "--pretty", "--input"])
        .arg(&path)
        .output()
        .expect("decode should run");
    assert!(decoded.status.success());
    assert_eq!(stdout_text(&decoded), "{\n  \"n\": true\n}");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn inspect_json_lists_fields() {
    let output = run_with_stdin(&["inspect", "--hex", "--format", "json"], b"016E0E01");
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_str(&stdout_text(&output)).unwrap();
    assert_eq!(rows[0]["name"], "n");
    assert_eq!(rows[0]["type"], "BOL");
    assert_eq!(rows[0]["value"], "true");
}

#[test]
fn digest_is_sha256_hex() {
    let output = run_with_stdin(&["digest", "--hex", "--format", "raw"], b"016E0E01");
    assert!(output.status.success());
    let digest = stdout_text(&output);
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
}

#[test]
fn dump_prints_four_lines_per_row() {
    let output = run_with_stdin(&["dump"], b"AB");
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout).to_string();
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("|065:41:A|066:42:B|"));
}

#[test]
fn truncated_frame_exits_with_data_invalid() {
    let output = run_with_stdin(&["decode", "--hex"], b"016E0A0000");
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("decode failed"));
}

#[test]
fn malformed_json_exits_with_data_invalid() {
    let output = run_with_stdin(&["encode"], br#"{"one":1,"two":2,}"#);
    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Expected name at 1:18"));
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_dataframe"))
        .arg("version")
        .output()
        .expect("version should run");
    assert!(output.status.success());
    assert_eq!(
        stdout_text(&output),
        format!("dataframe {}", env!("CARGO_PKG_VERSION"))
    );
}

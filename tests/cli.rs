//! Smoke tests for the `zmt` binary: file and pipe round trips, exit codes.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn zmt() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zmt"))
}

#[test]
fn file_round_trip_via_options() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("input.bin");
    let packed = dir.path().join("input.zmt");
    let restored = dir.path().join("restored.bin");

    let original: Vec<u8> = b"compress me, twenty ways to sunday. "
        .iter()
        .copied()
        .cycle()
        .take(600 * 1024)
        .collect();
    std::fs::write(&src, &original).unwrap();

    let status = zmt()
        .args(["-q", "-T", "4", "-B", "128K"])
        .arg(&src)
        .arg("-o")
        .arg(&packed)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(packed.metadata().unwrap().len() < original.len() as u64);

    let status = zmt()
        .args(["-q", "-d"])
        .arg(&packed)
        .arg("-o")
        .arg(&restored)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(std::fs::read(&restored).unwrap(), original);
}

#[test]
fn pipe_round_trip_with_lz4_codec() {
    let original = b"pipe data pipe data pipe data".repeat(2000);

    let mut child = zmt()
        .args(["-q", "-4", "-T", "2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&original).unwrap();
    let packed = child.wait_with_output().unwrap();
    assert!(packed.status.success());
    assert!(!packed.stdout.is_empty());

    let mut child = zmt()
        .args(["-q", "-4", "-d"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(&packed.stdout)
        .unwrap();
    let restored = child.wait_with_output().unwrap();
    assert!(restored.status.success());
    assert_eq!(restored.stdout, original);
}

#[test]
fn summary_line_reports_sizes() {
    let mut child = zmt()
        .args(["-T", "1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&[0u8; 4096]).unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    let summary = String::from_utf8_lossy(&out.stderr);
    assert!(summary.contains("4096"), "summary was: {summary}");
    assert!(summary.contains("1 frames"), "summary was: {summary}");
}

#[test]
fn unknown_option_fails_with_usage() {
    let out = zmt().arg("--frobnicate").output().unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("usage:"));
}

#[test]
fn version_flag_prints_version() {
    let out = zmt().arg("-V").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("zmt "));
}

#[test]
fn bad_level_is_a_clean_error() {
    let mut child = zmt()
        .args(["-99"])
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"x").unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("level"), "stderr was: {stderr}");
}

//! Command-line tests for the voxmerge binary.

use std::path::Path;
use std::process::{Command, Output};

fn voxmerge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_voxmerge"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run voxmerge")
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_merge_two_channels() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.raw");
    let b = dir.path().join("b.raw");
    let out = dir.path().join("out.raw");
    std::fs::write(&a, [255u8, 0, 100, 50]).unwrap();
    std::fs::write(&b, [0u8, 128, 100, 250]).unwrap();

    let result = voxmerge(&[
        "merge", "-d", "2x2x1",
        "-i", path_str(&a), "-i", path_str(&b),
        "-c", "255,0,0", "-c", "green",
        "--alpha", "max",
        "-o", path_str(&out),
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let data = std::fs::read(&out).unwrap();
    assert_eq!(
        data,
        vec![255, 0, 0, 255, 0, 128, 0, 128, 100, 100, 0, 100, 50, 250, 0, 250]
    );
}

#[test]
fn test_merge_u16_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ch.raw");
    let config = dir.path().join("merge.yaml");
    let out = dir.path().join("out.raw");

    let bytes: Vec<u8> = [0u16, 1000, 65535].iter().flat_map(|v| v.to_le_bytes()).collect();
    std::fs::write(&input, bytes).unwrap();
    std::fs::write(&config, "build_alpha: true\nluminance_mode: true\n").unwrap();

    let result = voxmerge(&[
        "merge", "-d", "3x1x1", "-t", "u16",
        "-i", path_str(&input), "-c", "white",
        "--config", path_str(&config),
        "--tiles", "2",
        "-o", path_str(&out),
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    // values past 255 clamp to the last table entry
    let data = std::fs::read(&out).unwrap();
    assert_eq!(data, vec![0, 0, 0, 0, 255, 255, 255, 255, 255, 255, 255, 255]);
}

#[test]
fn test_merge_rejects_missing_color() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.raw");
    let out = dir.path().join("out.raw");
    std::fs::write(&a, [1u8; 8]).unwrap();

    let result = voxmerge(&[
        "merge", "-d", "2x2x2",
        "-i", path_str(&a), "-i", path_str(&a),
        "-c", "red",
        "-o", path_str(&out),
    ]);
    assert!(!result.status.success());
    assert!(!out.exists());
}

#[test]
fn test_merge_rejects_short_file() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.raw");
    let out = dir.path().join("out.raw");
    std::fs::write(&a, [1u8; 7]).unwrap();

    let result = voxmerge(&[
        "merge", "-d", "2x2x2", "-i", path_str(&a), "-c", "red", "-o", path_str(&out),
    ]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Invalid volume"));
}

#[test]
fn test_merge_rejects_unknown_type() {
    let result = voxmerge(&[
        "merge", "-d", "1x1x1", "-t", "f16", "-i", "a.raw", "-c", "red", "-o", "out.raw",
    ]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Unsupported element type"));
}

#[test]
fn test_table_output() {
    let result = voxmerge(&["table", "-c", "0,255,0", "--step", "255"]);
    assert!(result.status.success());

    let text = String::from_utf8(result.stdout).unwrap();
    let rows: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(rows, vec!["0 0 0 0", "255 0 255 0"]);
}

#[test]
fn test_table_with_remap() {
    let result = voxmerge(&["table", "-c", "white", "-r", "0:127"]);
    assert!(result.status.success());

    let text = String::from_utf8(result.stdout).unwrap();
    let rows: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(rows.len(), 256);
    assert_eq!(rows[127], "127 255 255 255");
    assert_eq!(rows[200], "200 255 255 255");
}

#[test]
fn test_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("run.log");

    let result = voxmerge(&["-vv", "--log", path_str(&log), "table", "-c", "red", "--step", "64"]);
    assert!(result.status.success());
    assert!(log.exists());
}

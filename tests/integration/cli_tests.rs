//! Command-line driver tests.
//!
//! Tests run the compiled binary and check exit codes, usage output and the
//! files it leaves behind.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use image::ImageFormat;

use super::test_utils::write_image;

fn run(args: &[&OsStr], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dzi-tiler"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_no_arguments_prints_usage() {
    let cwd = tempfile::tempdir().unwrap();
    let output = run(&[], cwd.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {}", stderr);
    assert_eq!(std::fs::read_dir(cwd.path()).unwrap().count(), 0);
}

#[test]
fn test_one_argument_prints_usage() {
    let cwd = tempfile::tempdir().unwrap();
    let output = run(&[OsStr::new("input")], cwd.path());

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert_eq!(std::fs::read_dir(cwd.path()).unwrap().count(), 0);
}

#[test]
fn test_batch_with_text_file_exits_zero() {
    let input = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("out");
    write_image(input.path(), "moon.jpg", 300, 200, ImageFormat::Jpeg);
    std::fs::write(input.path().join("notes.txt"), "skip me").unwrap();

    let output = run(
        &[
            input.path().as_os_str(),
            out.as_os_str(),
            OsStr::new("https://example.com/tiles"),
        ],
        root.path(),
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stderr.contains("Level 9 -> 2 tiles"), "stderr: {}", stderr);

    let mut entries: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["moon", "moon.dzi"]);

    let xml = std::fs::read_to_string(out.join("moon.dzi")).unwrap();
    assert!(xml.contains("Url=\"https://example.com/tiles/moon/\""));
}

#[test]
fn test_json_report() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_image(input.path(), "dot.png", 3, 2, ImageFormat::Png);

    let output = run(
        &[
            input.path().as_os_str(),
            out.path().as_os_str(),
            OsStr::new("--json"),
            OsStr::new("--format"),
            OsStr::new("png"),
        ],
        out.path(),
    );
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["processed"][0]["name"], "dot");
    assert_eq!(report["processed"][0]["max_level"], 2);
    assert_eq!(report["processed"][0]["total_tiles"], 3);
    assert!(out.path().join("dot/2/0_0.png").is_file());
}

#[test]
fn test_invalid_overlap_fails_without_output() {
    let input = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("out");

    let output = run(
        &[
            input.path().as_os_str(),
            out.as_os_str(),
            OsStr::new("--tile-size"),
            OsStr::new("8"),
            OsStr::new("--overlap"),
            OsStr::new("9"),
        ],
        root.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
}

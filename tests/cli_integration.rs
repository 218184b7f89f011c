//! CLI integration tests
//!
//! These tests run the compiled binary and check:
//! - Command parsing and validation
//! - Output formatting
//! - Exit codes

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn devprobe_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_devprobe"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn create_rust_project(dir: &TempDir) -> PathBuf {
    let project = dir.path().to_path_buf();

    let cargo_toml = r#"[package]
name = "test-project"
version = "0.1.0"
edition = "2021"

[dependencies]
tokio = "1.0"
"#;
    fs::write(project.join("Cargo.toml"), cargo_toml).expect("Failed to write Cargo.toml");
    fs::create_dir_all(project.join("src")).expect("Failed to create src directory");
    fs::write(project.join("src/main.rs"), "fn main() {}\n").expect("Failed to write main.rs");

    project
}

#[test]
fn test_cli_help() {
    let output = Command::new(devprobe_bin())
        .arg("--help")
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("devprobe"));
    assert!(stdout.contains("detect"));
    assert!(stdout.contains("detectors"));
}

#[test]
fn test_cli_version() {
    let output = Command::new(devprobe_bin())
        .arg("--version")
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("devprobe"));
}

#[test]
fn test_detect_help() {
    let output = Command::new(devprobe_bin())
        .args(["detect", "--help"])
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--format"));
    assert!(stdout.contains("--all"));
    assert!(stdout.contains("--detectors"));
}

#[test]
fn test_detect_nonexistent_path() {
    let output = Command::new(devprobe_bin())
        .args(["detect", "/nonexistent/path/12345"])
        .output()
        .expect("Failed to execute devprobe");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
}

#[test]
fn test_detect_file_instead_of_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("file.txt");
    fs::write(&file_path, "content").expect("Failed to write file");

    let output = Command::new(devprobe_bin())
        .arg("detect")
        .arg(file_path)
        .output()
        .expect("Failed to execute devprobe");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a directory"));
}

#[test]
fn test_detect_empty_directory_exits_one() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = Command::new(devprobe_bin())
        .arg("detect")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to execute devprobe");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_detect_json_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let project = create_rust_project(&temp_dir);

    let output = Command::new(devprobe_bin())
        .arg("detect")
        .arg(project)
        .args(["--format", "json"])
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(value["language"], "rust");
    assert_eq!(value["version"], "1.75");
    assert_eq!(value["confidence"], 1.0);
}

#[test]
fn test_detect_yaml_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let project = create_rust_project(&temp_dir);

    let output = Command::new(devprobe_bin())
        .arg("detect")
        .arg(project)
        .args(["--format", "yaml"])
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("language: rust"));
}

#[test]
fn test_detect_human_format() {
    let output = Command::new(devprobe_bin())
        .arg("detect")
        .arg(fixture("go-service"))
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("go 1.22"));
    assert!(stdout.contains("Services:"));
}

#[test]
fn test_detect_all_lists_every_match() {
    let output = Command::new(devprobe_bin())
        .arg("detect")
        .arg(fixture("polyglot"))
        .args(["--all", "-f", "json"])
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let detections = value.as_array().expect("array of detections");
    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0]["language"], "go");
    assert_eq!(detections[1]["language"], "node");
}

#[test]
fn test_detectors_flag_restricts_registry() {
    let output = Command::new(devprobe_bin())
        .arg("detect")
        .arg(fixture("polyglot"))
        .args(["--detectors", "node", "-f", "json"])
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["language"], "node");
}

#[test]
fn test_unknown_detector_is_an_error() {
    let output = Command::new(devprobe_bin())
        .arg("detect")
        .arg(fixture("polyglot"))
        .args(["--detectors", "cobol"])
        .output()
        .expect("Failed to execute devprobe");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cobol"));
}

#[test]
fn test_detect_with_output_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let project = create_rust_project(&temp_dir);
    let output_file = temp_dir.path().join("output.json");

    let output = Command::new(devprobe_bin())
        .arg("detect")
        .arg(project)
        .args(["--format", "json", "--output"])
        .arg(&output_file)
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let content = fs::read_to_string(&output_file).expect("Failed to read output file");
    assert!(content.contains("\"language\": \"rust\""));
}

#[test]
fn test_detectors_command() {
    let output = Command::new(devprobe_bin())
        .args(["detectors", "--format", "json"])
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let names: Vec<_> = value
        .as_array()
        .expect("array of detectors")
        .iter()
        .map(|d| d["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["node", "go", "python", "rust"]);
}

#[test]
fn test_invalid_format() {
    let output = Command::new(devprobe_bin())
        .args(["detect", "--format", "dockerfile"])
        .output()
        .expect("Failed to execute devprobe");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid value"));
}

#[test]
fn test_global_flags_accepted() {
    for flags in [["-v"], ["-q"]] {
        let output = Command::new(devprobe_bin())
            .args(flags)
            .arg("detectors")
            .output()
            .expect("Failed to execute devprobe");
        assert!(output.status.success());
    }

    let output = Command::new(devprobe_bin())
        .args(["--log-level", "debug", "detectors"])
        .output()
        .expect("Failed to execute devprobe");
    assert!(output.status.success());
}

#[test]
fn test_log_level_flag_overrides_environment() {
    let output = Command::new(devprobe_bin())
        .env("DEVPROBE_LOG_LEVEL", "chatty")
        .args(["--log-level", "debug", "detect"])
        .arg(fixture("go-service"))
        .args(["-f", "json"])
        .output()
        .expect("Failed to execute devprobe");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["language"], "go");

    let output = Command::new(devprobe_bin())
        .env("DEVPROBE_LOG_LEVEL", "chatty")
        .arg("-q")
        .arg("detect")
        .arg(fixture("go-service"))
        .output()
        .expect("Failed to execute devprobe");
    assert!(output.status.success());
}

#[test]
fn test_invalid_log_level_flag_is_an_error() {
    let output = Command::new(devprobe_bin())
        .env_remove("DEVPROBE_LOG_LEVEL")
        .args(["--log-level", "chatty", "detect"])
        .arg(fixture("go-service"))
        .output()
        .expect("Failed to execute devprobe");

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("chatty"));
}

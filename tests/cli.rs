//! CLI integration tests for the miragic binary

#![cfg(feature = "cli")]

use std::process::Command;
use tempfile::TempDir;

fn miragic(dir: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_miragic"));
    command
        .current_dir(dir.path())
        .env_remove("MIRAGIC_API_KEY")
        .env_remove("MIRAGIC_API_BASE_URL")
        .env_remove("MIRAGIC_API_TIMEOUT")
        .env_remove("MIRAGIC_API_MAX_RETRIES")
        .env_remove("RUST_LOG");
    command
}

#[test]
fn test_version_flag() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = miragic(&temp_dir)
        .arg("--version")
        .output()
        .expect("Failed to run miragic");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_api_key_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = miragic(&temp_dir)
        .arg("status")
        .output()
        .expect("Failed to run miragic");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("MIRAGIC_API_KEY"), "stderr: {stderr}");
}

#[test]
fn test_missing_input_fails_without_network() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = miragic(&temp_dir)
        .env("MIRAGIC_API_KEY", "test-key")
        .env("MIRAGIC_API_BASE_URL", "http://127.0.0.1:9")
        .args(["remove-bg", "missing.jpg", "out.png"])
        .output()
        .expect("Failed to run miragic");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Input not found"), "stderr: {stderr}");

    // Directories are set up before the operation runs
    assert!(temp_dir.path().join("input").is_dir());
    assert!(temp_dir.path().join("output").is_dir());
    assert!(!temp_dir.path().join("out.png").exists());
}

#[test]
fn test_out_of_range_option_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("in.jpg");
    std::fs::write(input, b"x").unwrap();

    let output = miragic(&temp_dir)
        .env("MIRAGIC_API_KEY", "test-key")
        .env("MIRAGIC_API_BASE_URL", "http://127.0.0.1:9")
        .args(["upscale", "in.jpg", "out.jpg", "--scale", "9"])
        .output()
        .expect("Failed to run miragic");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("scale_factor"), "stderr: {stderr}");
}

#[test]
fn test_unknown_subcommand_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = miragic(&temp_dir)
        .arg("sharpen")
        .output()
        .expect("Failed to run miragic");
    assert!(!output.status.success());
}

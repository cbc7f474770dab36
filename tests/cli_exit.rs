//! Runs the built binary to check how failures are reported.

use std::process::Command;

#[test]
fn test_failure_reaches_stderr_with_logging_off() {
    let root = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_uno-card-generator"))
        .env_clear()
        .env("RUST_LOG", "off")
        .arg("--output-dir")
        .arg(root.path().join("out"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("API key is required"), "stderr was: {stderr}");
    assert!(!root.path().join("out").exists());
}

//! Error scenario integration tests

use std::process::Command;

use tempfile::TempDir;

fn voice_memos_bin(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_voice-memos"));
    cmd.env("VOICE_MEMOS_CONFIG", home.path().join("config.toml"))
        .env_remove("VOICE_MEMOS_STORAGE_DIR")
        .env_remove("VOICE_MEMOS_RECORDINGS_DIR");
    cmd
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = voice_memos_bin(&home)
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown key") && stderr.contains("recordings_dir"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = voice_memos_bin(&home)
        .args(["config", "set", "api_key", "value"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(!home.path().join("config.toml").exists());
}

#[test]
fn config_set_invalid_duration() {
    let home = TempDir::new().unwrap();
    let output = voice_memos_bin(&home)
        .args(["config", "set", "poll_interval", "often"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid duration"),
        "Expected error about invalid duration, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_boolean() {
    let home = TempDir::new().unwrap();
    let output = voice_memos_bin(&home)
        .args(["config", "set", "notify", "maybe"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("'true' or 'false'"),
        "Expected error about invalid boolean, got: {}",
        stderr
    );
}

#[test]
fn config_list_with_no_file() {
    let home = TempDir::new().unwrap();
    let output = voice_memos_bin(&home)
        .args(["config", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("max_duration"));
    assert!(stdout.contains("(not set)"));
}

#[test]
fn unreadable_config_file_is_ignored_for_list() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.toml"), "notify = [").unwrap();

    let output = voice_memos_bin(&home)
        .arg("list")
        .arg("--storage-dir")
        .arg(home.path().join("store"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
}

#[test]
fn unreadable_config_file_fails_config_get() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.toml"), "notify = [").unwrap();

    let output = voice_memos_bin(&home)
        .args(["config", "get", "notify"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config file"));
}

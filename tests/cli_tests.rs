//! CLI integration tests

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary isolated from the user's config and data directories
fn voice_memos(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("voice-memos").expect("binary builds");
    cmd.env_remove("VOICE_MEMOS_RECORDINGS_DIR")
        .env_remove("VOICE_MEMOS_STORAGE_DIR")
        .env_remove("RUST_LOG")
        .env("VOICE_MEMOS_CONFIG", home.join("config.toml"))
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"));
    cmd
}

fn storage_dir(home: &Path) -> std::path::PathBuf {
    home.join("store")
}

fn seed_recordings(home: &Path, names: &[&str]) {
    let audio = home.join("audio");
    fs::create_dir_all(&audio).unwrap();
    let entries: Vec<String> = names
        .iter()
        .map(|name| {
            let uri = audio.join(name);
            fs::write(&uri, format!("audio for {}", name)).unwrap();
            format!(
                r#"{{"uri":"{}","name":"{}"}}"#,
                uri.display().to_string().replace('\\', "\\\\"),
                name
            )
        })
        .collect();

    fs::create_dir_all(storage_dir(home)).unwrap();
    fs::write(
        storage_dir(home).join("recordings.json"),
        format!("[{}]", entries.join(",")),
    )
    .unwrap();
}

fn stored_json(home: &Path) -> String {
    fs::read_to_string(storage_dir(home).join("recordings.json")).unwrap()
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    voice_memos(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("record"))
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("--notify"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    voice_memos(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voice-memos"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_subcommand_is_usage_error() {
    let home = TempDir::new().unwrap();
    voice_memos(home.path()).assert().code(2);
}

#[test]
fn config_path_uses_override() {
    let home = TempDir::new().unwrap();
    voice_memos(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    voice_memos(home.path())
        .args(["config", "set", "max_duration", "5m"])
        .assert()
        .success();

    voice_memos(home.path())
        .args(["config", "get", "max_duration"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5m\n"));
}

#[test]
fn config_init_twice_fails() {
    let home = TempDir::new().unwrap();
    voice_memos(home.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(home.path().join("config.toml").exists());

    voice_memos(home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn list_without_recordings() {
    let home = TempDir::new().unwrap();
    voice_memos(home.path())
        .arg("list")
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No recordings yet"));
}

#[test]
fn list_prints_in_insertion_order() {
    let home = TempDir::new().unwrap();
    seed_recordings(home.path(), &["recording-3.flac", "recording-1.flac"]);

    let output = voice_memos(home.path())
        .arg("list")
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.find("recording-3.flac").unwrap();
    let second = stdout.find("recording-1.flac").unwrap();
    assert!(first < second);
}

#[test]
fn list_with_corrupt_storage_is_empty() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(storage_dir(home.path())).unwrap();
    fs::write(storage_dir(home.path()).join("recordings.json"), "{not json").unwrap();

    voice_memos(home.path())
        .arg("list")
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .assert()
        .success()
        .stderr(predicate::str::contains("No recordings yet"));
}

#[test]
fn delete_with_yes_removes_one_entry() {
    let home = TempDir::new().unwrap();
    seed_recordings(home.path(), &["a", "b", "c"]);

    voice_memos(home.path())
        .args(["delete", "b", "--yes"])
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .assert()
        .success();

    let json = stored_json(home.path());
    assert!(json.contains(r#""name":"a""#));
    assert!(!json.contains(r#""name":"b""#));
    assert!(json.contains(r#""name":"c""#));
    // The audio file itself is kept
    assert!(home.path().join("audio").join("b").exists());
}

#[test]
fn delete_declined_keeps_entry() {
    let home = TempDir::new().unwrap();
    seed_recordings(home.path(), &["a"]);

    voice_memos(home.path())
        .args(["delete", "a"])
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Cancelled"));

    assert!(stored_json(home.path()).contains(r#""name":"a""#));
}

#[test]
fn delete_confirmed_from_stdin() {
    let home = TempDir::new().unwrap();
    seed_recordings(home.path(), &["a"]);

    voice_memos(home.path())
        .args(["delete", "a"])
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .write_stdin("y\n")
        .assert()
        .success();

    assert_eq!(stored_json(home.path()).trim(), "[]");
}

#[test]
fn delete_unknown_fails() {
    let home = TempDir::new().unwrap();
    seed_recordings(home.path(), &["a"]);

    voice_memos(home.path())
        .args(["delete", "zzz", "--yes"])
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No recording named 'zzz'"));
}

#[test]
fn export_copies_file_under_its_name() {
    let home = TempDir::new().unwrap();
    seed_recordings(home.path(), &["recording-42.flac"]);
    let out = home.path().join("exports");

    voice_memos(home.path())
        .args(["export", "recording-42.flac", "--dir"])
        .arg(&out)
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .assert()
        .success()
        .stdout(predicate::str::contains("recording-42.flac"));

    let copied = fs::read_to_string(out.join("recording-42.flac")).unwrap();
    assert_eq!(copied, "audio for recording-42.flac");
}

#[test]
fn export_unknown_fails() {
    let home = TempDir::new().unwrap();
    voice_memos(home.path())
        .args(["export", "missing", "--dir"])
        .arg(home.path().join("exports"))
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not save the file"));
}

#[test]
fn record_with_bad_max_duration_is_usage_error() {
    let home = TempDir::new().unwrap();
    voice_memos(home.path())
        .args(["record", "--max-duration", "forever"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid max-duration"));
}

#[test]
fn play_unknown_fails() {
    let home = TempDir::new().unwrap();
    seed_recordings(home.path(), &["a"]);

    voice_memos(home.path())
        .args(["play", "zzz"])
        .arg("--storage-dir")
        .arg(storage_dir(home.path()))
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No recording named 'zzz'"));
}

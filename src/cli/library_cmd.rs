//! `list`, `delete` and `export` commands

use std::path::Path;
use std::process::ExitCode;

use crate::application::{LibraryConfig, RecordingLibrary};
use crate::application::ports::Notifier;
use crate::domain::config::AppConfig;
use crate::infrastructure::{create_notifier, FileKeyValueStore, FsExporter};

use super::app::{open_recordings, EXIT_ERROR, EXIT_SUCCESS};
use super::presenter::Presenter;

type Library = RecordingLibrary<FileKeyValueStore, FsExporter, Box<dyn Notifier>>;

fn open_library(config: &AppConfig) -> Library {
    RecordingLibrary::new(
        open_recordings(config),
        FsExporter::new(),
        create_notifier(),
        LibraryConfig {
            export_dir: config.export_dir_or_default(),
            enable_notify: config.notify_or_default(),
        },
    )
}

/// Print every stored recording, oldest first
pub async fn run_list(config: &AppConfig, presenter: &Presenter) -> ExitCode {
    let library = open_library(config);

    match library.list().await {
        Ok(entries) if entries.is_empty() => {
            presenter.info("No recordings yet");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(entries) => {
            for entry in &entries {
                presenter.entry(entry);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Remove `name` from the list after confirmation
pub async fn run_delete(
    config: &AppConfig,
    name: &str,
    skip_confirm: bool,
    presenter: &Presenter,
) -> ExitCode {
    if !skip_confirm {
        presenter.prompt(&format!("Delete recording '{}'? [y/N]", name));
        if !read_confirmation().await {
            presenter.info("Cancelled");
            return ExitCode::from(EXIT_SUCCESS);
        }
    }

    let library = open_library(config);
    match library.delete(name).await {
        Ok(true) => {
            presenter.success(&format!("Deleted {}", name));
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(false) => {
            presenter.error(&format!("No recording named '{}'", name));
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Copy `name` into `dir` or the configured export directory
pub async fn run_export(
    config: &AppConfig,
    name: &str,
    dir: Option<&Path>,
    presenter: &Presenter,
) -> ExitCode {
    let library = open_library(config);

    match library.export(name, dir).await {
        Ok(path) => {
            presenter.success("Recording saved");
            presenter.output(&path.to_string_lossy());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&format!("Could not save the file: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Read one line from stdin; only an explicit yes confirms
async fn read_confirmation() -> bool {
    let answer = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    })
    .await;

    match answer {
        Ok(Ok(line)) => is_yes(&line),
        _ => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

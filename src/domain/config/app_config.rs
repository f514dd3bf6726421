//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Directory name used under the platform config/data directories
pub const APP_DIR_NAME: &str = "voice-memos";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub recordings_dir: Option<String>,
    pub storage_dir: Option<String>,
    pub export_dir: Option<String>,
    pub poll_interval: Option<String>,
    pub max_duration: Option<String>,
    pub notify: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            recordings_dir: Some(default_recordings_dir().to_string_lossy().to_string()),
            storage_dir: Some(default_storage_dir().to_string_lossy().to_string()),
            export_dir: Some(default_export_dir().to_string_lossy().to_string()),
            poll_interval: Some("1s".to_string()),
            max_duration: Some("60m".to_string()),
            notify: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            recordings_dir: other.recordings_dir.or(self.recordings_dir),
            storage_dir: other.storage_dir.or(self.storage_dir),
            export_dir: other.export_dir.or(self.export_dir),
            poll_interval: other.poll_interval.or(self.poll_interval),
            max_duration: other.max_duration.or(self.max_duration),
            notify: other.notify.or(self.notify),
        }
    }

    /// Directory capture files are written to
    pub fn recordings_dir_or_default(&self) -> PathBuf {
        self.recordings_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_recordings_dir)
    }

    /// Directory holding the key-value store files
    pub fn storage_dir_or_default(&self) -> PathBuf {
        self.storage_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_storage_dir)
    }

    /// Directory exported copies are written to
    pub fn export_dir_or_default(&self) -> PathBuf {
        self.export_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_export_dir)
    }

    /// Get poll_interval as parsed Duration, or default if not set/invalid
    pub fn poll_interval_or_default(&self) -> Duration {
        self.poll_interval
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_poll_interval)
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_DIR_NAME)
}

fn default_storage_dir() -> PathBuf {
    data_dir()
}

fn default_recordings_dir() -> PathBuf {
    data_dir().join("recordings")
}

fn default_export_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

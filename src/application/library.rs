//! Recording library use case
//!
//! Lists, deletes and exports stored recordings, keeping an in-memory
//! display list in step with the persisted one.

use std::path::{Path, PathBuf};
use std::sync::Mutex as StdMutex;

use crate::domain::recording::RecordingEntry;

use super::ports::{
    ExportError, Exporter, KeyValueStore, NotificationIcon, Notifier, StorageError,
};
use super::recordings_store::RecordingsStore;

/// Configuration for the recording library
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Default directory for exported copies
    pub export_dir: PathBuf,
    /// Whether to show desktop notifications for exports
    pub enable_notify: bool,
}

/// List mutation and export over the persisted recordings
pub struct RecordingLibrary<S, E, N>
where
    S: KeyValueStore,
    E: Exporter,
    N: Notifier,
{
    store: RecordingsStore<S>,
    exporter: E,
    notifier: N,
    entries: StdMutex<Vec<RecordingEntry>>,
    config: LibraryConfig,
}

impl<S, E, N> RecordingLibrary<S, E, N>
where
    S: KeyValueStore,
    E: Exporter,
    N: Notifier,
{
    /// Create a library with an empty display list
    pub fn new(store: RecordingsStore<S>, exporter: E, notifier: N, config: LibraryConfig) -> Self {
        Self {
            store,
            exporter,
            notifier,
            entries: StdMutex::new(Vec::new()),
            config,
        }
    }

    /// The display list as of the last `list` or `delete`
    pub fn entries(&self) -> Vec<RecordingEntry> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn replace_entries(&self, entries: &[RecordingEntry]) {
        let mut cached = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        cached.clear();
        cached.extend_from_slice(entries);
    }

    /// Read every stored recording in insertion order
    pub async fn list(&self) -> Result<Vec<RecordingEntry>, StorageError> {
        let entries = self.store.load().await.inspect_err(|e| {
            tracing::error!(error = %e, "failed to load recordings");
        })?;
        self.replace_entries(&entries);
        Ok(entries)
    }

    /// Remove the recording called `name` from the list.
    ///
    /// The audio file itself is left in place. Returns whether an entry
    /// was removed.
    pub async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let (entries, removed) = self.store.remove(name).await.inspect_err(|e| {
            tracing::error!(name, error = %e, "failed to delete recording");
        })?;
        self.replace_entries(&entries);

        if removed {
            tracing::info!(name, "recording deleted");
        } else {
            tracing::debug!(name, "no recording to delete");
        }
        Ok(removed)
    }

    /// Copy the recording called `name` into `dir`, or the configured
    /// export directory, keeping its name as the filename.
    pub async fn export(&self, name: &str, dir: Option<&Path>) -> Result<PathBuf, ExportError> {
        let dir = dir.unwrap_or(&self.config.export_dir);

        let result = self.export_to(name, dir).await;
        match &result {
            Ok(path) => {
                tracing::info!(name, path = %path.display(), "recording exported");
                self.notify("Recording saved", &path.display().to_string(), NotificationIcon::Success)
                    .await;
            }
            Err(e) => {
                tracing::error!(name, dir = %dir.display(), error = %e, "failed to export recording");
                self.notify("Error", "Could not save the file.", NotificationIcon::Error)
                    .await;
            }
        }
        result
    }

    async fn export_to(&self, name: &str, dir: &Path) -> Result<PathBuf, ExportError> {
        let entry = self
            .store
            .find(name)
            .await
            .map_err(|e| ExportError::Storage(e.to_string()))?
            .ok_or_else(|| ExportError::UnknownRecording(name.to_string()))?;

        self.exporter.export(&entry.uri, dir, &entry.name).await
    }

    async fn notify(&self, title: &str, message: &str, icon: NotificationIcon) {
        if !self.config.enable_notify {
            return;
        }
        if let Err(e) = self.notifier.notify(title, message, icon).await {
            tracing::debug!(error = %e, "notification failed");
        }
    }
}

//! Export port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Export errors
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("No recording named '{0}'")]
    UnknownRecording(String),

    #[error("Failed to read recordings: {0}")]
    Storage(String),

    #[error("Failed to read '{uri}': {message}")]
    ReadFailed { uri: String, message: String },

    #[error("Failed to write '{path}': {message}")]
    WriteFailed { path: String, message: String },

    #[error("'{0}' is not a plain file name")]
    InvalidFileName(String),
}

/// Port for copying a recording out of the app's storage
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Copy the audio at `uri` into `dir` as `filename`.
    ///
    /// # Returns
    /// The path of the written copy
    async fn export(&self, uri: &str, dir: &Path, filename: &str)
        -> Result<PathBuf, ExportError>;
}

//! Filesystem exporter
//!
//! Copies the raw bytes of a recording into a target directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{ExportError, Exporter};

/// Exporter writing plain file copies
#[derive(Debug, Default, Clone, Copy)]
pub struct FsExporter;

impl FsExporter {
    /// Create a new filesystem exporter
    pub fn new() -> Self {
        Self
    }

    /// Turn a stored uri into a local path, accepting `file://` uris
    fn local_path(uri: &str) -> &Path {
        Path::new(uri.strip_prefix("file://").unwrap_or(uri))
    }

    /// `filename` must name a single entry directly inside the target dir
    fn plain_file_name(filename: &str) -> Result<&Path, ExportError> {
        let path = Path::new(filename);
        match path.file_name() {
            Some(name) if name == path.as_os_str() => Ok(path),
            _ => Err(ExportError::InvalidFileName(filename.to_string())),
        }
    }
}

#[async_trait]
impl Exporter for FsExporter {
    async fn export(
        &self,
        uri: &str,
        dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, ExportError> {
        let filename = Self::plain_file_name(filename)?;
        let bytes = fs::read(Self::local_path(uri))
            .await
            .map_err(|e| ExportError::ReadFailed {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        let target = dir.join(filename);
        let write_err = |e: std::io::Error| ExportError::WriteFailed {
            path: target.display().to_string(),
            message: e.to_string(),
        };

        fs::create_dir_all(dir).await.map_err(write_err)?;
        fs::write(&target, &bytes).await.map_err(write_err)?;

        tracing::debug!(uri, path = %target.display(), bytes = bytes.len(), "exported recording");
        Ok(target)
    }
}

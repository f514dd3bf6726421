//! Recording entry entity

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Prefix of every generated recording name
pub const RECORDING_NAME_PREFIX: &str = "recording-";

/// File extension of stored recordings
pub const RECORDING_EXTENSION: &str = "flac";

/// A stored recording.
///
/// `name` is the unique key used for listing, playback selection and
/// deletion. `uri` points at the audio file, which is owned by the
/// capture backend rather than by the recordings list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingEntry {
    pub uri: String,
    pub name: String,
}

impl RecordingEntry {
    /// Create an entry from an existing uri and name
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
        }
    }

    /// Create an entry for a capture finalized at `epoch_millis`
    pub fn captured_at(uri: impl Into<String>, epoch_millis: u64) -> Self {
        Self::new(uri, Self::name_for(epoch_millis))
    }

    /// Display name for a recording stopped at `epoch_millis`
    pub fn name_for(epoch_millis: u64) -> String {
        format!(
            "{}{}.{}",
            RECORDING_NAME_PREFIX, epoch_millis, RECORDING_EXTENSION
        )
    }
}

impl fmt::Display for RecordingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.uri)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn epoch_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

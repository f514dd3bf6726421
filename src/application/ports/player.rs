//! Audio playback port interfaces

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during playback
#[derive(Error, Debug, Clone)]
pub enum PlaybackError {
    /// No audio output device available
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// The audio file could not be opened or decoded
    #[error("Failed to load '{uri}': {message}")]
    LoadFailed { uri: String, message: String },

    /// A play/pause/stop call on a loaded player failed
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// No stored recording has the requested name
    #[error("No recording named '{0}'")]
    UnknownRecording(String),

    /// The recordings list could not be read
    #[error("Failed to read recordings: {0}")]
    Storage(String),
}

/// Called once when a player reaches the end of its audio
pub type FinishCallback = Arc<dyn Fn() + Send + Sync>;

/// Port for the platform audio playback subsystem
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Load the audio file at `uri` into a new, not yet playing, player.
    ///
    /// `on_finish` fires when playback reaches the end on its own. It does
    /// not fire after [`PlayerHandle::stop`].
    async fn load(
        &self,
        uri: &str,
        on_finish: FinishCallback,
    ) -> Result<Arc<dyn PlayerHandle>, PlaybackError>;
}

/// A loaded player
#[async_trait]
pub trait PlayerHandle: Send + Sync {
    /// Start or resume playback
    async fn play(&self) -> Result<(), PlaybackError>;

    /// Pause playback, keeping the position
    async fn pause(&self) -> Result<(), PlaybackError>;

    /// Stop playback and release the output
    async fn stop(&self) -> Result<(), PlaybackError>;
}

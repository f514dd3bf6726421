//! Audio capture port interfaces

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("Failed to write recording: {0}")]
    WriteFailed(String),

    #[error("No audio device available")]
    NoAudioDevice,
}

/// Port for the platform audio capture subsystem.
///
/// Each call to [`AudioCapture::start`] configures the device and begins a
/// fresh capture, returning the handle that owns it.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Ask for permission to capture audio.
    ///
    /// # Returns
    /// `true` when capturing is allowed
    async fn request_permission(&self) -> bool;

    /// Configure the audio subsystem and begin a new capture.
    ///
    /// # Returns
    /// A handle to the in-progress capture or an error
    async fn start(&self) -> Result<Arc<dyn CaptureHandle>, RecordingError>;
}

/// An in-progress capture.
#[async_trait]
pub trait CaptureHandle: Send + Sync {
    /// Query elapsed capture time in milliseconds
    async fn elapsed_ms(&self) -> Result<u64, RecordingError>;

    /// Finalize the capture and release the device.
    ///
    /// # Returns
    /// The location of the finished audio file
    async fn stop(&self) -> Result<String, RecordingError>;
}

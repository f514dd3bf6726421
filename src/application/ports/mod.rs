//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod exporter;
pub mod notifier;
pub mod player;
pub mod recorder;
pub mod storage;

// Re-export common types
pub use config::ConfigStore;
pub use exporter::{ExportError, Exporter};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use player::{AudioPlayer, FinishCallback, PlaybackError, PlayerHandle};
pub use recorder::{AudioCapture, CaptureHandle, RecordingError};
pub use storage::{KeyValueStore, StorageError};

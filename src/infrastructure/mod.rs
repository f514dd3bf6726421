//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces backed by the audio
//! devices, the filesystem and the desktop notification service.

pub mod config;
pub mod export;
pub mod notification;
pub mod playback;
pub mod recording;
pub mod storage;

// Re-export adapters
pub use config::XdgConfigStore;
pub use export::FsExporter;
pub use notification::{create_notifier, NotifyRustNotifier};
pub use playback::RodioPlayer;
pub use recording::CpalCapture;
pub use storage::FileKeyValueStore;

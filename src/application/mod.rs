//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod library;
pub mod playback;
pub mod ports;
pub mod recording_session;
pub mod recordings_store;

// Re-export use cases
pub use library::{LibraryConfig, RecordingLibrary};
pub use playback::{PlayOutcome, PlaybackController};
pub use recording_session::{
    Clock, RecordingSession, SessionConfig, SessionError, StartOutcome,
};
pub use recordings_store::{RecordingsStore, RECORDINGS_KEY};

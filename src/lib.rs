//! Voice Memos - record, list, play and export short audio clips
//!
//! Recordings are captured from the default microphone, stored as FLAC
//! files, and tracked in a persisted list of `{uri, name}` entries.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the session state machine, and errors
//! - **Application**: Recording session, playback controller, recording
//!   library, and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, file store,
//!   notify-rust, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and control input

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

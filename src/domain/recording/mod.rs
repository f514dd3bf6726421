//! Recording value objects

mod duration;
mod entry;

pub use duration::{Duration, DEFAULT_MAX_DURATION_SECS, DEFAULT_POLL_INTERVAL_MS};
pub use entry::{epoch_millis_now, RecordingEntry, RECORDING_EXTENSION, RECORDING_NAME_PREFIX};

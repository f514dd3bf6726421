//! Recording infrastructure module
//!
//! Captures microphone audio with cpal and stores it as mono FLAC.

mod cpal_recorder;
mod flac_encoder;

pub use cpal_recorder::{CpalCapture, CpalCaptureHandle};
pub use flac_encoder::{encode_to_flac, EncodingError, STORAGE_SAMPLE_RATE};

//! Cross-platform audio capture using cpal
//!
//! Each capture runs its input stream on a dedicated thread (cpal::Stream is
//! not Send). Samples are mixed down to mono, resampled to the storage rate
//! and written as a FLAC file when the capture is stopped.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::thread::JoinHandle;
use std::time::Instant;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::sync::oneshot;

use super::flac_encoder::{encode_to_flac, STORAGE_SAMPLE_RATE};
use crate::application::ports::{AudioCapture, CaptureHandle, RecordingError};
use crate::domain::recording::{epoch_millis_now, RECORDING_EXTENSION};

/// How often the capture thread checks whether it should stop
const STOP_POLL_MS: u64 = 50;

/// Audio capture backed by the default cpal input device
pub struct CpalCapture {
    recordings_dir: PathBuf,
}

impl CpalCapture {
    /// Create a capture backend writing files into `recordings_dir`
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, RecordingError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(RecordingError::NoAudioDevice)
    }

    /// Get a suitable input configuration
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), RecordingError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to get configs: {}", e)))?;

        // Prefer mono, and configs that include the storage rate
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= STORAGE_SAMPLE_RATE
                && config.max_sample_rate().0 >= STORAGE_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let current_includes_target = current.min_sample_rate().0
                        <= STORAGE_SAMPLE_RATE
                        && current.max_sample_rate().0 >= STORAGE_SAMPLE_RATE;
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate = includes_target && !current_includes_target;
                    better_rate || (fewer_channels && includes_target == current_includes_target)
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(RecordingError::StartFailed(
            "No suitable config found".into(),
        ))?;

        let sample_rate = if config_range.min_sample_rate().0 <= STORAGE_SAMPLE_RATE
            && config_range.max_sample_rate().0 >= STORAGE_SAMPLE_RATE
        {
            SampleRate(STORAGE_SAMPLE_RATE)
        } else {
            config_range.max_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix interleaved multi-channel audio down to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels <= 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / chunk.len() as i32) as i16
            })
            .collect()
    }

    /// Resample mono audio from `source_rate` to `target_rate`
    fn resample(
        samples: &[i16],
        source_rate: u32,
        target_rate: u32,
    ) -> Result<Vec<i16>, RecordingError> {
        if source_rate == target_rate || samples.is_empty() {
            return Ok(samples.to_vec());
        }

        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

        let ratio = target_rate as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            target_rate as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            1,    // Mono
        )
        .map_err(|e| RecordingError::RecordingFailed(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());
            let mut chunk = samples_f32[input_pos..end_pos].to_vec();
            chunk.resize(frames_needed, 0.0);

            let resampled = resampler.process(&[chunk], None).map_err(|e| {
                RecordingError::RecordingFailed(format!("Resampling failed: {}", e))
            })?;

            output.extend(
                resampled[0]
                    .iter()
                    .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16),
            );
            input_pos = end_pos;
        }

        output.truncate(output_len);
        Ok(output)
    }

    /// Resample and encode captured samples
    fn encode_capture(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, RecordingError> {
        let resampled = Self::resample(samples, sample_rate, STORAGE_SAMPLE_RATE)?;
        encode_to_flac(&resampled, STORAGE_SAMPLE_RATE)
            .map_err(|e| RecordingError::RecordingFailed(format!("Encoding failed: {}", e)))
    }
}

/// State shared between a capture handle and its stream thread
struct CaptureShared {
    buffer: StdMutex<Vec<i16>>,
    sample_rate: AtomicU32,
    is_recording: AtomicBool,
}

impl CaptureShared {
    fn push(&self, mono: &[i16]) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.extend_from_slice(mono);
        }
    }
}

/// Build, start and hold the input stream until `is_recording` clears
fn run_capture_thread(shared: Arc<CaptureShared>, ready: oneshot::Sender<Result<(), RecordingError>>) {
    let stream = match build_stream(&shared) {
        Ok(stream) => stream,
        Err(e) => {
            shared.is_recording.store(false, Ordering::SeqCst);
            let _ = ready.send(Err(e));
            return;
        }
    };

    if let Err(e) = stream.play() {
        shared.is_recording.store(false, Ordering::SeqCst);
        let _ = ready.send(Err(RecordingError::StartFailed(e.to_string())));
        return;
    }

    if ready.send(Ok(())).is_err() {
        // The starter went away; nobody will ever stop this capture
        shared.is_recording.store(false, Ordering::SeqCst);
    }

    while shared.is_recording.load(Ordering::SeqCst) {
        std::thread::sleep(std::time::Duration::from_millis(STOP_POLL_MS));
    }

    drop(stream);
}

fn build_stream(shared: &Arc<CaptureShared>) -> Result<cpal::Stream, RecordingError> {
    let device = CpalCapture::get_input_device()?;
    let (config, sample_format) = CpalCapture::get_input_config(&device)?;
    let channels = config.channels;
    shared.sample_rate.store(config.sample_rate.0, Ordering::SeqCst);

    let on_error = |err: cpal::StreamError| tracing::warn!(error = %err, "audio input stream error");

    let stream = match sample_format {
        SampleFormat::I16 => {
            let shared = Arc::clone(shared);
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if shared.is_recording.load(Ordering::SeqCst) {
                        shared.push(&CpalCapture::stereo_to_mono(data, channels));
                    }
                },
                on_error,
                None,
            )
        }
        SampleFormat::F32 => {
            let shared = Arc::clone(shared);
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shared.is_recording.load(Ordering::SeqCst) {
                        let i16_data: Vec<i16> = data
                            .iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
                            .collect();
                        shared.push(&CpalCapture::stereo_to_mono(&i16_data, channels));
                    }
                },
                on_error,
                None,
            )
        }
        _ => {
            return Err(RecordingError::StartFailed(
                "Unsupported sample format".into(),
            ))
        }
    };

    stream.map_err(|e| RecordingError::StartFailed(e.to_string()))
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn request_permission(&self) -> bool {
        // Desktop hosts have no permission prompt; an input device is enough
        tokio::task::spawn_blocking(|| cpal::default_host().default_input_device().is_some())
            .await
            .unwrap_or(false)
    }

    async fn start(&self) -> Result<Arc<dyn CaptureHandle>, RecordingError> {
        tokio::fs::create_dir_all(&self.recordings_dir)
            .await
            .map_err(|e| RecordingError::StartFailed(format!("Cannot create recordings dir: {}", e)))?;

        let shared = Arc::new(CaptureShared {
            buffer: StdMutex::new(Vec::new()),
            sample_rate: AtomicU32::new(0),
            is_recording: AtomicBool::new(true),
        });

        let (ready_tx, ready_rx) = oneshot::channel();
        let thread_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name("voice-memos-capture".into())
            .spawn(move || run_capture_thread(thread_shared, ready_tx))
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        ready_rx
            .await
            .map_err(|_| RecordingError::StartFailed("Capture thread exited".into()))??;

        let path = self.recordings_dir.join(format!(
            "capture-{}.{}",
            epoch_millis_now(),
            RECORDING_EXTENSION
        ));
        tracing::debug!(
            sample_rate = shared.sample_rate.load(Ordering::SeqCst),
            path = %path.display(),
            "capture started"
        );

        Ok(Arc::new(CpalCaptureHandle {
            shared,
            path,
            started: Instant::now(),
            thread: StdMutex::new(Some(thread)),
        }))
    }
}

/// Handle to one running cpal capture
pub struct CpalCaptureHandle {
    shared: Arc<CaptureShared>,
    path: PathBuf,
    started: Instant,
    thread: StdMutex<Option<JoinHandle<()>>>,
}

#[async_trait]
impl CaptureHandle for CpalCaptureHandle {
    async fn elapsed_ms(&self) -> Result<u64, RecordingError> {
        Ok(self.started.elapsed().as_millis() as u64)
    }

    async fn stop(&self) -> Result<String, RecordingError> {
        if !self.shared.is_recording.swap(false, Ordering::SeqCst) {
            return Err(RecordingError::RecordingFailed(
                "Capture is not running".to_string(),
            ));
        }

        let thread = self
            .thread
            .lock()
            .map_err(|_| RecordingError::RecordingFailed("Capture state poisoned".into()))?
            .take();
        if let Some(thread) = thread {
            tokio::task::spawn_blocking(move || thread.join())
                .await
                .map_err(|e| RecordingError::RecordingFailed(format!("Task join error: {}", e)))?
                .map_err(|_| RecordingError::RecordingFailed("Capture thread panicked".into()))?;
        }

        let sample_rate = self.shared.sample_rate.load(Ordering::SeqCst);
        let samples = {
            let mut buffer = self
                .shared
                .buffer
                .lock()
                .map_err(|_| RecordingError::RecordingFailed("Capture buffer poisoned".into()))?;
            std::mem::take(&mut *buffer)
        };

        if samples.is_empty() {
            return Err(RecordingError::RecordingFailed(
                "No audio data captured".to_string(),
            ));
        }

        let encoded =
            tokio::task::spawn_blocking(move || CpalCapture::encode_capture(&samples, sample_rate))
                .await
                .map_err(|e| RecordingError::RecordingFailed(format!("Encode task error: {}", e)))??;

        tokio::fs::write(&self.path, &encoded)
            .await
            .map_err(|e| RecordingError::WriteFailed(format!("{}: {}", self.path.display(), e)))?;

        Ok(self.path.to_string_lossy().to_string())
    }
}

impl Drop for CpalCaptureHandle {
    fn drop(&mut self) {
        self.shared.is_recording.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        assert_eq!(CpalCapture::stereo_to_mono(&mono, 1), mono);
    }

    #[test]
    fn stereo_to_mono_two_channels() {
        let stereo = vec![100i16, 200, 300, 400];
        assert_eq!(CpalCapture::stereo_to_mono(&stereo, 2), vec![150, 350]);
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let samples = vec![1i16, 2, 3];
        let out = CpalCapture::resample(&samples, 44_100, 44_100).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn resample_changes_length_by_ratio() {
        let samples = vec![0i16; 48_000];
        let out = CpalCapture::resample(&samples, 48_000, STORAGE_SAMPLE_RATE).unwrap();
        assert!(out.len() <= STORAGE_SAMPLE_RATE as usize);
        assert!(out.len() > 43_000);
    }

    #[test]
    fn encode_capture_produces_flac() {
        let samples = vec![0i16; 16_000];
        let flac = CpalCapture::encode_capture(&samples, 16_000).unwrap();
        assert_eq!(&flac[0..4], b"fLaC");
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn can_capture_briefly() {
        let dir = tempfile::tempdir().unwrap();
        let capture = CpalCapture::new(dir.path());
        assert!(capture.request_permission().await);

        let handle = capture.start().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        let uri = handle.stop().await.unwrap();
        assert!(std::path::Path::new(&uri).exists());
    }
}

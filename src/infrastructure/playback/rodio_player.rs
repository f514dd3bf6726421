//! Rodio-based audio player adapter
//!
//! Each loaded recording gets its own output thread. The thread owns the
//! `OutputStream` (not Send) and waits for the sink to drain, firing the
//! finish callback when the audio ends without an explicit stop.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot;

use crate::application::ports::{AudioPlayer, FinishCallback, PlaybackError, PlayerHandle};

/// Audio player implementation using rodio
pub struct RodioPlayer;

impl RodioPlayer {
    /// Create a new rodio-based player
    pub fn new() -> Self {
        Self
    }

    fn local_path(uri: &str) -> PathBuf {
        PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn load(
        &self,
        uri: &str,
        on_finish: FinishCallback,
    ) -> Result<Arc<dyn PlayerHandle>, PlaybackError> {
        let path = Self::local_path(uri);
        let uri = uri.to_string();
        let stopped = Arc::new(AtomicBool::new(false));

        let (ready_tx, ready_rx) = oneshot::channel();
        let thread_stopped = Arc::clone(&stopped);
        std::thread::Builder::new()
            .name("voice-memos-playback".into())
            .spawn(move || run_output_thread(path, uri, thread_stopped, on_finish, ready_tx))
            .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;

        let sink = ready_rx
            .await
            .map_err(|_| PlaybackError::DeviceNotAvailable("Output thread exited".into()))??;

        Ok(Arc::new(RodioPlayerHandle { sink, stopped }))
    }
}

/// Open the output, queue the decoded file paused, then wait for it to end
fn run_output_thread(
    path: PathBuf,
    uri: String,
    stopped: Arc<AtomicBool>,
    on_finish: FinishCallback,
    ready: oneshot::Sender<Result<Arc<Sink>, PlaybackError>>,
) {
    let (_stream, stream_handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };

    let sink = match Sink::try_new(&stream_handle) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            let _ = ready.send(Err(PlaybackError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };

    let source = File::open(&path)
        .map_err(|e| e.to_string())
        .and_then(|file| Decoder::new(BufReader::new(file)).map_err(|e| e.to_string()));
    let source = match source {
        Ok(source) => source,
        Err(message) => {
            let _ = ready.send(Err(PlaybackError::LoadFailed { uri, message }));
            return;
        }
    };

    sink.pause();
    sink.append(source);

    if ready.send(Ok(Arc::clone(&sink))).is_err() {
        return;
    }

    sink.sleep_until_end();

    if !stopped.load(Ordering::SeqCst) {
        tracing::debug!(uri = %uri, "playback reached end");
        on_finish();
    }
}

/// Handle to one loaded recording
pub struct RodioPlayerHandle {
    sink: Arc<Sink>,
    stopped: Arc<AtomicBool>,
}

impl RodioPlayerHandle {
    fn halt(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.sink.stop();
    }
}

#[async_trait]
impl PlayerHandle for RodioPlayerHandle {
    async fn play(&self) -> Result<(), PlaybackError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(PlaybackError::PlaybackFailed("Player was stopped".into()));
        }
        self.sink.play();
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlaybackError> {
        self.sink.pause();
        Ok(())
    }

    async fn stop(&self) -> Result<(), PlaybackError> {
        self.halt();
        Ok(())
    }
}

impl Drop for RodioPlayerHandle {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_strips_file_scheme() {
        assert_eq!(
            RodioPlayer::local_path("file:///tmp/a.flac"),
            PathBuf::from("/tmp/a.flac")
        );
        assert_eq!(RodioPlayer::local_path("/tmp/b.flac"), PathBuf::from("/tmp/b.flac"));
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn missing_file_fails_to_load() {
        let player = RodioPlayer::new();
        let result = player
            .load("/nonexistent/recording.flac", Arc::new(|| {}))
            .await;
        assert!(matches!(result, Err(PlaybackError::LoadFailed { .. })));
    }
}
